/*
 * Responsibility
 * - user request/response DTOs
 * - conversion into the service-level UserInput / out of the domain User
 */
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::User;
use crate::services::users::UserInput;

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub id: Option<i64>,
    pub email: String,
    pub login: String,
    pub name: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl From<UserRequest> for UserInput {
    fn from(req: UserRequest) -> Self {
        UserInput {
            id: req.id,
            email: req.email,
            login: req.login,
            name: req.name,
            birthday: req.birthday,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: NaiveDate,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            login: user.login,
            name: user.name,
            birthday: user.birthday,
        }
    }
}
