/*
 * Responsibility
 * - film request/response DTOs (wire format uses camelCase keys)
 * - conversion into the service-level FilmInput / out of the domain Film
 */
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Film, Genre, Mpa};
use crate::services::films::FilmInput;

#[derive(Debug, Deserialize)]
pub struct MpaRef {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct GenreRef {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmRequest {
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub release_date: Option<NaiveDate>,
    pub duration: i32,
    pub mpa: Option<MpaRef>,
    #[serde(default)]
    pub genres: Vec<GenreRef>,
}

impl From<FilmRequest> for FilmInput {
    fn from(req: FilmRequest) -> Self {
        FilmInput {
            id: req.id,
            name: req.name,
            description: req.description,
            release_date: req.release_date,
            duration: req.duration,
            mpa_id: req.mpa.map(|m| m.id),
            genre_ids: req.genres.into_iter().map(|g| g.id).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa: Mpa,
    pub genres: Vec<Genre>,
    pub likes: Vec<i64>,
}

impl From<Film> for FilmResponse {
    fn from(film: Film) -> Self {
        let mut likes: Vec<i64> = film.likes.into_iter().collect();
        likes.sort_unstable();
        FilmResponse {
            id: film.id,
            name: film.name,
            description: film.description,
            release_date: film.release_date,
            duration: film.duration,
            mpa: film.mpa,
            genres: film.genres,
            likes,
        }
    }
}
