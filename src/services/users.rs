/*
 * Responsibility
 * - user validation gate + name-defaults-to-login rule
 * - friendship engine entry points: existence checks here, the two-sided
 *   edge mutation in the storage backend
 */
use chrono::{NaiveDate, Utc};

use crate::error::AppError;
use crate::model::User;
use crate::state::AppState;

/// Candidate user before the gate has run.
#[derive(Debug, Clone)]
pub struct UserInput {
    pub id: Option<i64>,
    pub email: String,
    pub login: String,
    pub name: Option<String>,
    pub birthday: Option<NaiveDate>,
}

pub async fn create(state: &AppState, input: UserInput) -> Result<User, AppError> {
    let user = validate(&input)?;
    let user = state.users.add_user(user).await?;
    tracing::info!(user_id = user.id, login = %user.login, "user created");
    Ok(user)
}

pub async fn update(state: &AppState, input: UserInput) -> Result<User, AppError> {
    let id = input
        .id
        .ok_or_else(|| AppError::validation("user id is required for update"))?;
    get(state, id).await?;

    let mut user = validate(&input)?;
    user.id = id;
    let user = state.users.update_user(user).await?;
    tracing::info!(user_id = user.id, "user updated");
    Ok(user)
}

pub async fn delete(state: &AppState, user_id: i64) -> Result<(), AppError> {
    get(state, user_id).await?;
    state.users.delete_user(user_id).await?;
    tracing::info!(user_id, "user deleted");
    Ok(())
}

pub async fn get(state: &AppState, user_id: i64) -> Result<User, AppError> {
    state
        .users
        .user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user", user_id))
}

pub async fn list(state: &AppState) -> Result<Vec<User>, AppError> {
    Ok(state.users.all_users().await?)
}

/// Records a friend request from `user_id` to `friend_id`; when the
/// reverse edge already exists, both sides become confirmed.
pub async fn add_friend(state: &AppState, user_id: i64, friend_id: i64) -> Result<(), AppError> {
    get(state, user_id).await?;
    get(state, friend_id).await?;
    state.users.add_friend(user_id, friend_id).await?;
    tracing::info!(user_id, friend_id, "friend added");
    Ok(())
}

pub async fn remove_friend(state: &AppState, user_id: i64, friend_id: i64) -> Result<(), AppError> {
    get(state, user_id).await?;
    get(state, friend_id).await?;
    state.users.remove_friend(user_id, friend_id).await?;
    tracing::info!(user_id, friend_id, "friend removed");
    Ok(())
}

/// Friends of `user_id` under the strict contract: both directions must
/// exist, whatever their status.
pub async fn friends(state: &AppState, user_id: i64) -> Result<Vec<User>, AppError> {
    get(state, user_id).await?;
    Ok(state.users.friends(user_id).await?)
}

pub async fn common_friends(
    state: &AppState,
    user_id: i64,
    other_id: i64,
) -> Result<Vec<User>, AppError> {
    get(state, user_id).await?;
    get(state, other_id).await?;
    Ok(state.users.common_friends(user_id, other_id).await?)
}

/// The validation gate. A blank or absent display name falls back to the
/// login (a pure defaulting rule applied here, not in storage).
fn validate(input: &UserInput) -> Result<User, AppError> {
    let email = input.email.trim();
    if email.is_empty() {
        return Err(AppError::validation("email must not be blank"));
    }
    if !is_email_shaped(email) {
        return Err(AppError::validation("email must be a valid address"));
    }

    if input.login.is_empty() {
        return Err(AppError::validation("login must not be blank"));
    }
    if input.login.chars().any(char::is_whitespace) {
        return Err(AppError::validation("login must not contain whitespace"));
    }

    let birthday = input
        .birthday
        .ok_or_else(|| AppError::validation("birthday is required"))?;
    if birthday > Utc::now().date_naive() {
        return Err(AppError::validation("birthday must not be in the future"));
    }

    let name = match input.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => input.login.clone(),
    };

    Ok(User {
        id: 0,
        email: email.to_string(),
        login: input.login.clone(),
        name,
        birthday,
    })
}

fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn input(login: &str) -> UserInput {
        UserInput {
            id: None,
            email: format!("{login}@example.com"),
            login: login.to_string(),
            name: Some(login.to_string()),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 20),
        }
    }

    async fn two_users(state: &AppState) -> (User, User) {
        let a = create(state, input("alice")).await.unwrap();
        let b = create(state, input("bob")).await.unwrap();
        (a, b)
    }

    fn ids(users: &[User]) -> HashSet<i64> {
        users.iter().map(|u| u.id).collect()
    }

    #[tokio::test]
    async fn blank_name_defaults_to_login() {
        let state = AppState::in_memory();

        let mut req = input("bob");
        req.name = None;
        let user = create(&state, req).await.unwrap();
        assert_eq!(user.name, "bob");

        let mut req = input("carol");
        req.name = Some("   ".to_string());
        let user = create(&state, req).await.unwrap();
        assert_eq!(user.name, "carol");
    }

    #[tokio::test]
    async fn rejects_malformed_email_login_and_birthday() {
        let state = AppState::in_memory();

        let mut req = input("a");
        req.email = "not-an-address".to_string();
        assert!(matches!(
            create(&state, req).await.unwrap_err(),
            AppError::Validation { .. }
        ));

        let mut req = input("a");
        req.login = "has space".to_string();
        assert!(matches!(
            create(&state, req).await.unwrap_err(),
            AppError::Validation { .. }
        ));

        let mut req = input("a");
        req.birthday = Some(Utc::now().date_naive() + chrono::Days::new(1));
        assert!(matches!(
            create(&state, req).await.unwrap_err(),
            AppError::Validation { .. }
        ));
    }

    #[tokio::test]
    async fn one_sided_request_is_invisible_in_friends_listing() {
        let state = AppState::in_memory();
        let (a, b) = two_users(&state).await;

        add_friend(&state, a.id, b.id).await.unwrap();

        assert!(friends(&state, a.id).await.unwrap().is_empty());
        assert!(friends(&state, b.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_friend_is_commutative_in_effect() {
        let state = AppState::in_memory();
        let (a, b) = two_users(&state).await;

        add_friend(&state, a.id, b.id).await.unwrap();
        add_friend(&state, b.id, a.id).await.unwrap();

        assert_eq!(ids(&friends(&state, a.id).await.unwrap()), ids(&[b.clone()]));
        assert_eq!(ids(&friends(&state, b.id).await.unwrap()), ids(&[a.clone()]));
    }

    #[tokio::test]
    async fn remove_friend_hides_both_listings_but_keeps_reverse_edge() {
        let state = AppState::in_memory();
        let (a, b) = two_users(&state).await;

        add_friend(&state, a.id, b.id).await.unwrap();
        add_friend(&state, b.id, a.id).await.unwrap();
        remove_friend(&state, a.id, b.id).await.unwrap();

        assert!(friends(&state, a.id).await.unwrap().is_empty());
        assert!(friends(&state, b.id).await.unwrap().is_empty());

        // the surviving reverse edge means a single re-add confirms again
        add_friend(&state, a.id, b.id).await.unwrap();
        assert_eq!(ids(&friends(&state, a.id).await.unwrap()), ids(&[b.clone()]));
        assert_eq!(ids(&friends(&state, b.id).await.unwrap()), ids(&[a.clone()]));
    }

    #[tokio::test]
    async fn add_friend_names_the_missing_user() {
        let state = AppState::in_memory();
        let a = create(&state, input("alice")).await.unwrap();

        let err = add_friend(&state, a.id, 99).await.unwrap_err();
        match err {
            AppError::NotFound { what } => assert!(what.contains("99")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn common_friends_is_symmetric() {
        let state = AppState::in_memory();
        let (a, b) = two_users(&state).await;
        let c = create(&state, input("carol")).await.unwrap();
        let d = create(&state, input("dave")).await.unwrap();

        add_friend(&state, a.id, c.id).await.unwrap();
        add_friend(&state, a.id, d.id).await.unwrap();
        add_friend(&state, b.id, c.id).await.unwrap();

        let ab = common_friends(&state, a.id, b.id).await.unwrap();
        let ba = common_friends(&state, b.id, a.id).await.unwrap();

        assert_eq!(ids(&ab), ids(&[c.clone()]));
        assert_eq!(ids(&ab), ids(&ba));
    }

    #[tokio::test]
    async fn update_is_a_full_record_replace() {
        let state = AppState::in_memory();
        let user = create(&state, input("alice")).await.unwrap();

        let mut req = input("alice2");
        req.id = Some(user.id);
        let updated = update(&state, req).await.unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.login, "alice2");
        assert_eq!(get(&state, user.id).await.unwrap().login, "alice2");
    }

    #[tokio::test]
    async fn delete_makes_user_unresolvable() {
        let state = AppState::in_memory();
        let (a, b) = two_users(&state).await;

        delete(&state, a.id).await.unwrap();

        assert!(matches!(
            get(&state, a.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
        assert!(matches!(
            add_friend(&state, b.id, a.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
