use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::domain::repositories::UserRepository;
use crate::shared::Result;

/// Walks the manager tree stored through `users.manager_id`.
pub struct UserHierarchyService {
    users: Arc<dyn UserRepository>,
}

impl UserHierarchyService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Whether `target_id` is in the subtree rooted at `manager_id` (self included).
    pub async fn is_subordinate(&self, manager_id: i64, target_id: i64) -> Result<bool> {
        if manager_id == target_id {
            return Ok(true);
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(manager_id);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            for sub in self.users.list_by_manager(current).await? {
                if sub.id == target_id {
                    return Ok(true);
                }
                queue.push_back(sub.id);
            }
        }

        Ok(false)
    }

    /// A user does not count as their own manager.
    pub async fn is_manager_of(&self, manager_id: i64, employee_id: i64) -> Result<bool> {
        if manager_id == employee_id {
            return Ok(false);
        }
        self.is_subordinate(manager_id, employee_id).await
    }

    /// Would putting `employee_id` under `new_manager_id` create a cycle?
    /// That happens exactly when the new manager already sits in the
    /// employee's own subtree.
    pub async fn would_create_cycle(&self, employee_id: i64, new_manager_id: i64) -> Result<bool> {
        if employee_id == new_manager_id {
            return Ok(true);
        }
        self.is_subordinate(employee_id, new_manager_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;
    use crate::domain::repositories::MockUserRepository;
    use crate::shared::types::Role;

    fn user(id: i64, manager_id: Option<i64>) -> User {
        User {
            id,
            email: format!("u{}@taskchi.local", id),
            full_name: format!("User {}", id),
            password_hash: String::new(),
            role: Role::Staff,
            active: true,
            manager_id,
        }
    }

    /// 1 manages 2 and 3; 2 manages 4.
    fn service_with_tree() -> UserHierarchyService {
        let mut repo = MockUserRepository::new();
        repo.expect_list_by_manager().returning(|id| {
            Ok(match id {
                1 => vec![user(2, Some(1)), user(3, Some(1))],
                2 => vec![user(4, Some(2))],
                _ => vec![],
            })
        });
        UserHierarchyService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn finds_direct_and_transitive_subordinates() {
        let hierarchy = service_with_tree();
        assert!(hierarchy.is_manager_of(1, 2).await.unwrap());
        assert!(hierarchy.is_manager_of(1, 4).await.unwrap());
        assert!(!hierarchy.is_manager_of(2, 3).await.unwrap());
    }

    #[tokio::test]
    async fn a_user_is_not_their_own_manager() {
        let hierarchy = service_with_tree();
        assert!(!hierarchy.is_manager_of(2, 2).await.unwrap());
        assert!(hierarchy.is_subordinate(2, 2).await.unwrap());
    }

    #[tokio::test]
    async fn detects_cycles() {
        let hierarchy = service_with_tree();
        // 4 reports to 2; making 2 report to 4 would loop.
        assert!(hierarchy.would_create_cycle(2, 4).await.unwrap());
        assert!(hierarchy.would_create_cycle(3, 3).await.unwrap());
        assert!(!hierarchy.would_create_cycle(4, 3).await.unwrap());
    }
}
