/*
 * Responsibility
 * - film validation gate (structural rules + MPA/genre resolution)
 * - like add/remove and the popularity ranking
 * - existence checks turn storage Option into NotFound before any mutation
 */
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::AppError;
use crate::model::{Film, Genre, Mpa};
use crate::state::AppState;

/// 1895-12-28, the first public film screening; release dates before it
/// are rejected.
pub const EARLIEST_RELEASE: NaiveDate = match NaiveDate::from_ymd_opt(1895, 12, 28) {
    Some(d) => d,
    None => panic!("invalid earliest release date"),
};

const DEFAULT_POPULAR_COUNT: i64 = 10;

/// Candidate film before the gate has run: MPA and genres are still bare
/// id references.
#[derive(Debug, Clone)]
pub struct FilmInput {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub release_date: Option<NaiveDate>,
    pub duration: i32,
    pub mpa_id: Option<i64>,
    pub genre_ids: Vec<i64>,
}

pub async fn create(state: &AppState, input: FilmInput) -> Result<Film, AppError> {
    let film = validate(state, &input).await?;
    let film = state.films.add_film(film).await?;
    tracing::info!(film_id = film.id, name = %film.name, "film created");
    Ok(film)
}

pub async fn update(state: &AppState, input: FilmInput) -> Result<Film, AppError> {
    let id = input
        .id
        .ok_or_else(|| AppError::validation("film id is required for update"))?;
    let mut film = validate(state, &input).await?;
    film.id = id;

    let existing = get(state, id).await?;
    // likes survive a full-record replace
    film.likes = existing.likes;

    let film = state.films.update_film(film).await?;
    tracing::info!(film_id = film.id, "film updated");
    Ok(film)
}

pub async fn delete(state: &AppState, film_id: i64) -> Result<(), AppError> {
    get(state, film_id).await?;
    state.films.delete_film(film_id).await?;
    tracing::info!(film_id, "film deleted");
    Ok(())
}

pub async fn get(state: &AppState, film_id: i64) -> Result<Film, AppError> {
    state
        .films
        .film_by_id(film_id)
        .await?
        .ok_or_else(|| AppError::not_found("film", film_id))
}

pub async fn list(state: &AppState) -> Result<Vec<Film>, AppError> {
    Ok(state.films.all_films().await?)
}

pub async fn add_like(state: &AppState, film_id: i64, user_id: i64) -> Result<(), AppError> {
    require_film_and_user(state, film_id, user_id).await?;
    state.films.add_like(film_id, user_id).await?;
    tracing::info!(film_id, user_id, "like added");
    Ok(())
}

pub async fn remove_like(state: &AppState, film_id: i64, user_id: i64) -> Result<(), AppError> {
    require_film_and_user(state, film_id, user_id).await?;
    let removed = state.films.remove_like(film_id, user_id).await?;
    if !removed {
        return Err(AppError::NotFound {
            what: format!("like from user {user_id} on film {film_id}"),
        });
    }
    tracing::info!(film_id, user_id, "like removed");
    Ok(())
}

/// Films ordered by distinct like count descending, ties broken by
/// ascending id. `count <= 0` yields nothing.
pub async fn popular(state: &AppState, count: Option<i64>) -> Result<Vec<Film>, AppError> {
    let count = count.unwrap_or(DEFAULT_POPULAR_COUNT);
    if count <= 0 {
        return Ok(Vec::new());
    }

    let mut films = state.films.all_films().await?;
    films.sort_by(|a, b| {
        b.like_count()
            .cmp(&a.like_count())
            .then_with(|| a.id.cmp(&b.id))
    });
    films.truncate(count as usize);
    Ok(films)
}

/// The validation gate: runs before any mutation, so a rejected record
/// leaves prior state untouched. Resolves the MPA and genre references
/// against the lookup tables and returns the hydrated film (id 0).
async fn validate(state: &AppState, input: &FilmInput) -> Result<Film, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::validation("film name must not be blank"));
    }
    if input.description.chars().count() > 200 {
        return Err(AppError::validation(
            "film description must not exceed 200 characters",
        ));
    }
    let release_date = input
        .release_date
        .ok_or_else(|| AppError::validation("release date is required"))?;
    if release_date < EARLIEST_RELEASE {
        return Err(AppError::validation(
            "release date must not be before 1895-12-28",
        ));
    }
    if input.duration <= 0 {
        return Err(AppError::validation("film duration must be positive"));
    }

    let mpa_id = input
        .mpa_id
        .ok_or_else(|| AppError::validation("MPA rating is required"))?;
    let mpa: Mpa = state
        .mpa
        .mpa_by_id(mpa_id)
        .await?
        .ok_or_else(|| AppError::not_found("MPA rating", mpa_id))?;

    // dedupe by id, keep ascending order
    let mut genres: BTreeMap<i64, Genre> = BTreeMap::new();
    for genre_id in &input.genre_ids {
        let genre = state
            .genres
            .genre_by_id(*genre_id)
            .await?
            .ok_or_else(|| AppError::not_found("genre", *genre_id))?;
        genres.insert(genre.id, genre);
    }

    Ok(Film {
        id: 0,
        name: input.name.clone(),
        description: input.description.clone(),
        release_date,
        duration: input.duration,
        mpa,
        genres: genres.into_values().collect(),
        likes: Default::default(),
    })
}

async fn require_film_and_user(
    state: &AppState,
    film_id: i64,
    user_id: i64,
) -> Result<(), AppError> {
    // film checked first: film-not-found wins when both are missing
    get(state, film_id).await?;
    state
        .users
        .user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user", user_id))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::users;
    use crate::services::users::UserInput;

    fn film_input(name: &str) -> FilmInput {
        FilmInput {
            id: None,
            name: name.to_string(),
            description: "a film".to_string(),
            release_date: NaiveDate::from_ymd_opt(2000, 1, 1),
            duration: 120,
            mpa_id: Some(1),
            genre_ids: vec![1, 2],
        }
    }

    fn user_input(login: &str) -> UserInput {
        UserInput {
            id: None,
            email: format!("{login}@example.com"),
            login: login.to_string(),
            name: Some(login.to_string()),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 20),
        }
    }

    #[tokio::test]
    async fn rejects_release_date_before_first_screening_and_stores_nothing() {
        let state = AppState::in_memory();
        let mut input = film_input("too early");
        input.release_date = NaiveDate::from_ymd_opt(1895, 12, 27);

        let err = create(&state, input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(list(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn accepts_release_date_on_the_boundary() {
        let state = AppState::in_memory();
        let mut input = film_input("first ever");
        input.release_date = Some(EARLIEST_RELEASE);

        let film = create(&state, input).await.unwrap();
        assert_eq!(film.release_date, EARLIEST_RELEASE);
    }

    #[tokio::test]
    async fn rejects_blank_name_long_description_and_bad_duration() {
        let state = AppState::in_memory();

        let mut input = film_input("  ");
        assert!(matches!(
            create(&state, input).await.unwrap_err(),
            AppError::Validation { .. }
        ));

        input = film_input("ok");
        input.description = "x".repeat(201);
        assert!(matches!(
            create(&state, input).await.unwrap_err(),
            AppError::Validation { .. }
        ));

        input = film_input("ok");
        input.duration = 0;
        assert!(matches!(
            create(&state, input).await.unwrap_err(),
            AppError::Validation { .. }
        ));
    }

    #[tokio::test]
    async fn description_of_exactly_200_chars_is_accepted() {
        let state = AppState::in_memory();
        let mut input = film_input("ok");
        input.description = "x".repeat(200);
        assert!(create(&state, input).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_mpa_and_genre_references_are_not_found() {
        let state = AppState::in_memory();

        let mut input = film_input("ok");
        input.mpa_id = Some(99);
        assert!(matches!(
            create(&state, input).await.unwrap_err(),
            AppError::NotFound { .. }
        ));

        input = film_input("ok");
        input.genre_ids = vec![1, 99];
        assert!(matches!(
            create(&state, input).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn genres_are_deduplicated_and_ordered() {
        let state = AppState::in_memory();
        let mut input = film_input("ok");
        input.genre_ids = vec![2, 1, 2];

        let film = create(&state, input).await.unwrap();
        let ids: Vec<i64> = film.genres.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn double_like_is_idempotent() {
        let state = AppState::in_memory();
        let film = create(&state, film_input("f")).await.unwrap();
        let user = users::create(&state, user_input("u")).await.unwrap();

        add_like(&state, film.id, user.id).await.unwrap();
        add_like(&state, film.id, user.id).await.unwrap();

        assert_eq!(get(&state, film.id).await.unwrap().like_count(), 1);
    }

    #[tokio::test]
    async fn removing_an_absent_like_is_not_found() {
        let state = AppState::in_memory();
        let film = create(&state, film_input("f")).await.unwrap();
        let user = users::create(&state, user_input("u")).await.unwrap();

        let err = remove_like(&state, film.id, user.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn like_checks_film_before_user() {
        let state = AppState::in_memory();

        // both missing: the error must name the film
        let err = add_like(&state, 7, 8).await.unwrap_err();
        match err {
            AppError::NotFound { what } => assert!(what.contains("film")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn popular_orders_by_like_count_then_id() {
        let state = AppState::in_memory();
        let f1 = create(&state, film_input("one")).await.unwrap();
        let f2 = create(&state, film_input("two")).await.unwrap();
        let f3 = create(&state, film_input("three")).await.unwrap();

        let u1 = users::create(&state, user_input("u1")).await.unwrap();
        let u2 = users::create(&state, user_input("u2")).await.unwrap();

        // counts: f2 -> 2, f3 -> 1, f1 -> 0
        add_like(&state, f2.id, u1.id).await.unwrap();
        add_like(&state, f2.id, u2.id).await.unwrap();
        add_like(&state, f3.id, u1.id).await.unwrap();

        let top = popular(&state, Some(2)).await.unwrap();
        let ids: Vec<i64> = top.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![f2.id, f3.id]);

        // tie on zero likes resolves by ascending id
        remove_like(&state, f2.id, u1.id).await.unwrap();
        remove_like(&state, f2.id, u2.id).await.unwrap();
        remove_like(&state, f3.id, u1.id).await.unwrap();
        let all = popular(&state, None).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![f1.id, f2.id, f3.id]);
    }

    #[tokio::test]
    async fn popular_count_defaults_and_clamps() {
        let state = AppState::in_memory();
        create(&state, film_input("f")).await.unwrap();

        assert_eq!(popular(&state, None).await.unwrap().len(), 1);
        assert!(popular(&state, Some(0)).await.unwrap().is_empty());
        assert!(popular(&state, Some(-3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_record_but_keeps_likes() {
        let state = AppState::in_memory();
        let film = create(&state, film_input("before")).await.unwrap();
        let user = users::create(&state, user_input("u")).await.unwrap();
        add_like(&state, film.id, user.id).await.unwrap();

        let mut input = film_input("after");
        input.id = Some(film.id);
        input.genre_ids = vec![3];
        let updated = update(&state, input).await.unwrap();

        assert_eq!(updated.name, "after");
        assert_eq!(updated.genres.len(), 1);
        assert_eq!(updated.like_count(), 1);
    }

    #[tokio::test]
    async fn update_of_unknown_film_is_not_found() {
        let state = AppState::in_memory();
        let mut input = film_input("ghost");
        input.id = Some(42);
        assert!(matches!(
            update(&state, input).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
