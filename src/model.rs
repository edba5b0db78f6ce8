/*
 * Responsibility
 * - Domain types shared by storage, services and DTOs
 * - Fixed MPA / genre reference data (seeded identically in both backends)
 */
use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mpa {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Film {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa: Mpa,
    /// Ordered by genre id.
    pub genres: Vec<Genre>,
    /// Ids of users who liked this film.
    pub likes: HashSet<i64>,
}

impl Film {
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }
}

/// Per-direction state of a friendship edge. An edge `(a, b)` is the fact
/// that `a` lists `b` as a friend; confirmation only happens once both
/// directions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendshipStatus {
    Unconfirmed,
    Confirmed,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Unconfirmed => "UNCONFIRMED",
            FriendshipStatus::Confirmed => "CONFIRMED",
        }
    }

}

/// MPA lookup rows; the migration seeds the same values.
pub const MPA_SEED: &[(i64, &str)] = &[
    (1, "G"),
    (2, "PG"),
    (3, "PG-13"),
    (4, "R"),
    (5, "NC-17"),
];

/// Genre lookup rows; the migration seeds the same values.
pub const GENRE_SEED: &[(i64, &str)] = &[
    (1, "Comedy"),
    (2, "Drama"),
    (3, "Cartoon"),
    (4, "Thriller"),
    (5, "Documentary"),
    (6, "Action"),
];
