//! Todo 管理ユースケース
//!
//! 入力の検証はすべてリポジトリへの書き込みより前に行う。
//! 検証に失敗した場合、データベースは変更されない。

use std::sync::Arc;

use todoflow_domain::{
    clock::Clock,
    deadline::parse_deadline,
    filter::{TodoFilter, parse_completed, parse_window},
    todo::{NewTodo, Todo, TodoId, TodoTitle},
};
use todoflow_infra::repository::TodoRepository;
use todoflow_shared::{Patch, event_log::event, log_business_event};

use crate::error::TodoError;

/// 対象が存在しない場合のメッセージ
pub const TODO_NOT_FOUND: &str = "Todo not found";
/// 作成時にタイトルがない場合のメッセージ
pub const NO_TITLE_GIVEN: &str = "No title given";
/// 更新時にタイトルがない場合のメッセージ
pub const TODO_REQUIRES_TITLE: &str = "Todo requires title";

/// 一覧取得の入力（クエリパラメータの生の値）
#[derive(Debug, Clone, Default)]
pub struct ListTodosInput {
    pub completed: Option<String>,
    pub window:    Option<String>,
}

/// Todo 作成の入力
///
/// `None` はキーが存在しないか値が `null` であることを表す。
#[derive(Debug, Clone, Default)]
pub struct CreateTodoInput {
    pub title:       Option<String>,
    pub description: Option<String>,
    pub completed:   Option<bool>,
    pub deadline_at: Option<String>,
}

/// Todo 更新の入力
///
/// - `title`: 必須。`None` は 400
/// - `description` / `deadline_at`: `Absent` は維持、`Null` は削除、`Value` は設定
/// - `completed`: `None` は維持
#[derive(Debug, Clone, Default)]
pub struct UpdateTodoInput {
    pub title:       Option<String>,
    pub description: Patch<String>,
    pub completed:   Option<bool>,
    pub deadline_at: Patch<String>,
}

/// Todo 管理ユースケース
pub struct TodoUseCaseImpl {
    todo_repository: Arc<dyn TodoRepository>,
    clock:           Arc<dyn Clock>,
}

impl TodoUseCaseImpl {
    pub fn new(todo_repository: Arc<dyn TodoRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            todo_repository,
            clock,
        }
    }

    /// Todo 一覧を ID 昇順で取得する
    ///
    /// `completed` は `"true"` / `"false"` 以外を無視する。
    /// `window` は現在時刻から N 日以内に期限を迎えるものに絞り込む。
    #[tracing::instrument(skip_all, level = "debug")]
    pub async fn list_todos(&self, input: ListTodosInput) -> Result<Vec<Todo>, TodoError> {
        let completed = parse_completed(input.completed.as_deref());
        let window = parse_window(input.window.as_deref())?;

        let filter = TodoFilter::all()
            .with_completed(completed)
            .within_window(self.clock.now(), window);

        let todos = self.todo_repository.find_all(&filter).await?;
        Ok(todos)
    }

    /// Todo を 1 件取得する
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    pub async fn get_todo(&self, id: TodoId) -> Result<Todo, TodoError> {
        self.todo_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| TodoError::NotFound(TODO_NOT_FOUND.to_string()))
    }

    /// Todo を作成する
    ///
    /// 1. タイトルの検証（空なら 400）
    /// 2. 期限のパース（不正なら 400）
    /// 3. 挿入（ID はリポジトリが採番）
    #[tracing::instrument(skip_all, level = "debug")]
    pub async fn create_todo(&self, input: CreateTodoInput) -> Result<Todo, TodoError> {
        let title = input
            .title
            .and_then(|t| TodoTitle::new(t).ok())
            .ok_or_else(|| TodoError::BadRequest(NO_TITLE_GIVEN.to_string()))?;
        let deadline_at = input.deadline_at.as_deref().map(parse_deadline).transpose()?;

        let new_todo = NewTodo::new(
            title,
            input.description,
            input.completed.unwrap_or(false),
            deadline_at,
            self.clock.now(),
        );
        let todo = self.todo_repository.insert(&new_todo).await?;

        log_business_event!(
            event.category = event::category::TODO,
            event.action = event::action::TODO_CREATED,
            event.entity_type = event::entity_type::TODO,
            event.entity_id = %todo.id(),
            event.result = event::result::SUCCESS,
            "Todo 作成"
        );

        Ok(todo)
    }

    /// Todo を更新する
    ///
    /// `todo` は [`get_todo`](Self::get_todo) で取得済みのもの。
    /// 存在確認（404）はリクエストボディの解釈より先に行う。
    ///
    /// 1. タイトルと期限の検証（不正なら 400、何も書き込まない）
    /// 2. 変更を適用し `updated_at` を更新して保存
    #[tracing::instrument(skip_all, level = "debug", fields(id = %todo.id()))]
    pub async fn update_todo(
        &self,
        todo: Todo,
        input: UpdateTodoInput,
    ) -> Result<Todo, TodoError> {
        let title = input
            .title
            .and_then(|t| TodoTitle::new(t).ok())
            .ok_or_else(|| TodoError::BadRequest(TODO_REQUIRES_TITLE.to_string()))?;
        let deadline_at = input
            .deadline_at
            .map(|raw| parse_deadline(&raw))
            .transpose()?;

        let now = self.clock.now();
        let description = input.description.apply_to(todo.description().map(str::to_string));
        let deadline_at = deadline_at.apply_to(todo.deadline_at());
        let completed = input.completed.unwrap_or(todo.completed());

        let todo = todo
            .with_title(title, now)
            .with_description(description, now)
            .with_completed(completed, now)
            .with_deadline_at(deadline_at, now);

        let updated = self
            .todo_repository
            .update(&todo)
            .await?
            .ok_or_else(|| TodoError::NotFound(TODO_NOT_FOUND.to_string()))?;

        log_business_event!(
            event.category = event::category::TODO,
            event.action = event::action::TODO_UPDATED,
            event.entity_type = event::entity_type::TODO,
            event.entity_id = %updated.id(),
            event.result = event::result::SUCCESS,
            "Todo 更新"
        );

        Ok(updated)
    }

    /// Todo を削除する
    ///
    /// 削除した Todo を返す。対象が存在しない場合は `Ok(None)`（エラーにしない）。
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    pub async fn delete_todo(&self, id: TodoId) -> Result<Option<Todo>, TodoError> {
        let deleted = self.todo_repository.delete(id).await?;

        if deleted.is_some() {
            log_business_event!(
                event.category = event::category::TODO,
                event.action = event::action::TODO_DELETED,
                event.entity_type = event::entity_type::TODO,
                event.entity_id = %id,
                event.result = event::result::SUCCESS,
                "Todo 削除"
            );
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use todoflow_domain::clock::{FixedClock, SteppingClock};
    use todoflow_infra::{InfraError, mock::MockTodoRepository};

    use super::*;

    /// テスト用の固定日時
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[fixture]
    fn repo() -> MockTodoRepository {
        MockTodoRepository::new()
    }

    fn sut_with(repo: &MockTodoRepository) -> TodoUseCaseImpl {
        TodoUseCaseImpl::new(
            Arc::new(repo.clone()),
            Arc::new(SteppingClock::new(now(), Duration::seconds(1))),
        )
    }

    fn create_input(title: &str) -> CreateTodoInput {
        CreateTodoInput {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    fn update_input(title: Option<&str>) -> UpdateTodoInput {
        UpdateTodoInput {
            title: title.map(str::to_string),
            ..Default::default()
        }
    }

    /// 常にデータベースエラーを返すリポジトリ
    struct FailingTodoRepository;

    #[async_trait]
    impl TodoRepository for FailingTodoRepository {
        async fn insert(&self, _new_todo: &NewTodo) -> Result<Todo, InfraError> {
            Err(InfraError::unexpected("insert failed"))
        }

        async fn find_by_id(&self, _id: TodoId) -> Result<Option<Todo>, InfraError> {
            Err(InfraError::unexpected("find failed"))
        }

        async fn find_all(&self, _filter: &TodoFilter) -> Result<Vec<Todo>, InfraError> {
            Err(InfraError::unexpected("find failed"))
        }

        async fn update(&self, _todo: &Todo) -> Result<Option<Todo>, InfraError> {
            Err(InfraError::unexpected("update failed"))
        }

        async fn delete(&self, _id: TodoId) -> Result<Option<Todo>, InfraError> {
            Err(InfraError::unexpected("delete failed"))
        }
    }

    // ===== create_todo =====

    #[rstest]
    #[tokio::test]
    async fn test_タイトルのみで作成すると既定値が入る(repo: MockTodoRepository) {
        let sut = sut_with(&repo);

        let todo = sut.create_todo(create_input("Watch lecture")).await.unwrap();

        assert_eq!(todo.title().as_str(), "Watch lecture");
        assert!(!todo.completed());
        assert_eq!(todo.description(), None);
        assert_eq!(todo.deadline_at(), None);
        assert_eq!(todo.created_at(), todo.updated_at());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    #[tokio::test]
    async fn test_タイトルがないと作成できない(repo: MockTodoRepository, #[case] title: Option<&str>) {
        let sut = sut_with(&repo);
        let input = CreateTodoInput {
            title: title.map(str::to_string),
            ..Default::default()
        };

        let result = sut.create_todo(input).await;

        assert!(matches!(result, Err(TodoError::BadRequest(msg)) if msg == NO_TITLE_GIVEN));
        assert!(repo.todos().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_期限はiso8601としてパースされる(repo: MockTodoRepository) {
        let sut = sut_with(&repo);
        let input = CreateTodoInput {
            deadline_at: Some("2023-02-27T00:00:00".to_string()),
            ..create_input("A")
        };

        let todo = sut.create_todo(input).await.unwrap();

        assert_eq!(
            todo.deadline_at(),
            Some(DateTime::from_timestamp(1_677_456_000, 0).unwrap())
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_不正な期限では作成できない(repo: MockTodoRepository) {
        let sut = sut_with(&repo);
        let input = CreateTodoInput {
            deadline_at: Some("next friday".to_string()),
            ..create_input("A")
        };

        let result = sut.create_todo(input).await;

        assert!(matches!(result, Err(TodoError::BadRequest(msg)) if msg == "invalid deadline_at"));
        assert!(repo.todos().is_empty());
    }

    // ===== get_todo =====

    #[rstest]
    #[tokio::test]
    async fn test_存在しないidの取得はnot_found(repo: MockTodoRepository) {
        let sut = sut_with(&repo);

        let result = sut.get_todo(TodoId::new(1)).await;

        assert!(matches!(result, Err(TodoError::NotFound(msg)) if msg == TODO_NOT_FOUND));
    }

    // ===== list_todos =====

    #[rstest]
    #[tokio::test]
    async fn test_一覧はcompletedとwindowで絞り込まれる(repo: MockTodoRepository) {
        let sut = TodoUseCaseImpl::new(Arc::new(repo.clone()), Arc::new(FixedClock::new(now())));
        let soon = (now() + Duration::days(1)).to_rfc3339();
        let later = (now() + Duration::days(30)).to_rfc3339();
        for (title, completed, deadline) in [
            ("A", false, Some(soon.clone())),
            ("B", true, Some(soon)),
            ("C", false, Some(later)),
            ("D", false, None),
        ] {
            sut.create_todo(CreateTodoInput {
                completed: Some(completed),
                deadline_at: deadline,
                ..create_input(title)
            })
            .await
            .unwrap();
        }

        let result = sut
            .list_todos(ListTodosInput {
                completed: Some("false".to_string()),
                window:    Some("7".to_string()),
            })
            .await
            .unwrap();

        let titles: Vec<_> = result.iter().map(|t| t.title().as_str()).collect();
        assert_eq!(titles, vec!["A"]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_不正なwindowはbad_request(repo: MockTodoRepository) {
        let sut = sut_with(&repo);

        let result = sut
            .list_todos(ListTodosInput {
                window: Some("-3".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(TodoError::BadRequest(msg)) if msg == "invalid window"));
    }

    // ===== update_todo =====

    #[rstest]
    #[tokio::test]
    async fn test_タイトルと完了フラグの更新は他のフィールドを維持する(repo: MockTodoRepository) {
        let sut = sut_with(&repo);
        let created = sut
            .create_todo(CreateTodoInput {
                description: Some("desc".to_string()),
                deadline_at: Some("2023-02-27".to_string()),
                ..create_input("A")
            })
            .await
            .unwrap();

        let updated = sut
            .update_todo(created.clone(), UpdateTodoInput {
                completed: Some(true),
                ..update_input(Some("A"))
            })
            .await
            .unwrap();

        assert!(updated.completed());
        assert_eq!(updated.description(), Some("desc"));
        assert_eq!(updated.deadline_at(), created.deadline_at());
        assert_eq!(updated.created_at(), created.created_at());
        assert!(updated.updated_at() > created.updated_at());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[tokio::test]
    async fn test_タイトルなしの更新は何も書き込まない(repo: MockTodoRepository, #[case] title: Option<&str>) {
        let sut = sut_with(&repo);
        let created = sut.create_todo(create_input("A")).await.unwrap();

        let result = sut
            .update_todo(created.clone(), UpdateTodoInput {
                completed: Some(true),
                ..update_input(title)
            })
            .await;

        assert!(matches!(result, Err(TodoError::BadRequest(msg)) if msg == TODO_REQUIRES_TITLE));
        assert_eq!(repo.todos(), vec![created]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_取得後に削除された場合の更新はnot_found(repo: MockTodoRepository) {
        let sut = sut_with(&repo);
        let created = sut.create_todo(create_input("A")).await.unwrap();
        sut.delete_todo(created.id()).await.unwrap();

        let result = sut.update_todo(created, update_input(Some("B"))).await;

        assert!(matches!(result, Err(TodoError::NotFound(msg)) if msg == TODO_NOT_FOUND));
        assert!(repo.todos().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_nullで説明と期限を削除できる(repo: MockTodoRepository) {
        let sut = sut_with(&repo);
        let created = sut
            .create_todo(CreateTodoInput {
                description: Some("desc".to_string()),
                deadline_at: Some("2023-02-27".to_string()),
                ..create_input("A")
            })
            .await
            .unwrap();

        let updated = sut
            .update_todo(created, UpdateTodoInput {
                description: Patch::Null,
                deadline_at: Patch::Null,
                ..update_input(Some("A"))
            })
            .await
            .unwrap();

        assert_eq!(updated.description(), None);
        assert_eq!(updated.deadline_at(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn test_不正な期限での更新は何も書き込まない(repo: MockTodoRepository) {
        let sut = sut_with(&repo);
        let created = sut.create_todo(create_input("A")).await.unwrap();

        let result = sut
            .update_todo(created.clone(), UpdateTodoInput {
                deadline_at: Patch::Value("someday".to_string()),
                ..update_input(Some("B"))
            })
            .await;

        assert!(matches!(result, Err(TodoError::BadRequest(msg)) if msg == "invalid deadline_at"));
        assert_eq!(repo.todos(), vec![created]);
    }

    // ===== delete_todo =====

    #[rstest]
    #[tokio::test]
    async fn test_削除は削除したtodoを返し存在しなければnone(repo: MockTodoRepository) {
        let sut = sut_with(&repo);
        let created = sut.create_todo(create_input("A")).await.unwrap();

        let first = sut.delete_todo(created.id()).await.unwrap();
        let second = sut.delete_todo(created.id()).await.unwrap();

        assert_eq!(first, Some(created));
        assert_eq!(second, None);
    }

    // ===== エラー伝播 =====

    #[tokio::test]
    async fn test_リポジトリのエラーはdatabaseエラーとして伝播する() {
        let sut = TodoUseCaseImpl::new(
            Arc::new(FailingTodoRepository),
            Arc::new(FixedClock::new(now())),
        );

        let result = sut.list_todos(ListTodosInput::default()).await;

        assert!(matches!(result, Err(TodoError::Database(_))));
    }
}
