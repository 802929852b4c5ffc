use actix_web::{web, HttpResponse};
use mongodb::bson::Document;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::book::{self, BookField, Filter};
use crate::state::AppState;

const FETCH_FAILED: &str = "Failed to fetch Books.";
const ADD_FAILED: &str = "Failed to add new Book.";
const UPDATE_FAILED: &str = "Failed to update Book Data.";
const DELETE_FAILED: &str = "Failed to delete Book";

const BOOK_NOT_FOUND: &str = "Book not found.";
const BOOK_MISSING: &str = "Book does not exist.";

type Response = Result<HttpResponse, ApiError>;

/// Body of a successful write: a message plus the book under a route-specific key.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookMessage {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_book: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_book: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted_book: Option<Value>,
}

fn list(books: Vec<Document>, missing: &'static str) -> Response {
    if books.is_empty() {
        return Err(ApiError::NotFound(missing));
    }
    let body: Vec<Value> = books.iter().map(book::to_json).collect();
    Ok(HttpResponse::Ok().json(body))
}

fn updated(result: Option<Document>) -> Response {
    match result {
        Some(updated_book) => Ok(HttpResponse::Ok().json(BookMessage {
            message: "Book data updated successfully.",
            updated_book: Some(book::to_json(&updated_book)),
            ..Default::default()
        })),
        None => Err(ApiError::NotFound(BOOK_MISSING)),
    }
}

// GET /books
pub async fn get_books(state: web::Data<AppState>) -> Response {
    let books = state
        .store
        .find_all()
        .await
        .map_err(ApiError::fault(FETCH_FAILED))?;
    list(books, "Books not found.")
}

// POST /books
pub async fn add_book(state: web::Data<AppState>, body: web::Json<Value>) -> Response {
    let data = book::cast_payload(&body).map_err(ApiError::fault(ADD_FAILED))?;
    let stored = state
        .store
        .insert(data)
        .await
        .map_err(ApiError::fault(ADD_FAILED))?;

    match stored {
        Some(new_book) => {
            let new_book = book::to_json(&new_book);
            log::info!("New book {}", new_book["_id"]);
            Ok(HttpResponse::Created().json(BookMessage {
                message: "Book Data added successfully",
                new_book: Some(new_book),
                ..Default::default()
            }))
        }
        None => Err(ApiError::NotFound(BOOK_NOT_FOUND)),
    }
}

// GET /books/{title}
pub async fn get_book_by_title(state: web::Data<AppState>, path: web::Path<String>) -> Response {
    let filter = Filter::new(BookField::Title, path.into_inner());
    match state
        .store
        .find_one(&filter)
        .await
        .map_err(ApiError::fault(FETCH_FAILED))?
    {
        Some(found) => Ok(HttpResponse::Ok().json(book::to_json(&found))),
        None => Err(ApiError::NotFound(BOOK_NOT_FOUND)),
    }
}

async fn find_by(state: &AppState, field: BookField, value: String) -> Response {
    let books = state
        .store
        .find_many(&Filter::new(field, value))
        .await
        .map_err(ApiError::fault(FETCH_FAILED))?;
    list(books, BOOK_NOT_FOUND)
}

// GET /books/author/{author}
pub async fn get_books_by_author(state: web::Data<AppState>, path: web::Path<String>) -> Response {
    find_by(&state, BookField::Author, path.into_inner()).await
}

// GET /books/genre/{genre}
pub async fn get_books_by_genre(state: web::Data<AppState>, path: web::Path<String>) -> Response {
    find_by(&state, BookField::Genre, path.into_inner()).await
}

// GET /books/publishedYear/{year}
pub async fn get_books_by_year(state: web::Data<AppState>, path: web::Path<String>) -> Response {
    find_by(&state, BookField::PublishedYear, path.into_inner()).await
}

// POST /books/{id}
pub async fn update_book_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Response {
    let data = book::cast_payload(&body).map_err(ApiError::fault(UPDATE_FAILED))?;
    let result = state
        .store
        .update_by_id(&path, data)
        .await
        .map_err(ApiError::fault(UPDATE_FAILED))?;
    updated(result)
}

// POST /books/title/{title}
pub async fn update_book_by_title(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Response {
    let data = book::cast_payload(&body).map_err(ApiError::fault(UPDATE_FAILED))?;
    let filter = Filter::new(BookField::Title, path.into_inner());
    let result = state
        .store
        .update_one(&filter, data)
        .await
        .map_err(ApiError::fault(UPDATE_FAILED))?;
    updated(result)
}

// DELETE /books/{id}
pub async fn delete_book(state: web::Data<AppState>, path: web::Path<String>) -> Response {
    let deleted = state
        .store
        .delete_by_id(&path)
        .await
        .map_err(ApiError::fault(DELETE_FAILED))?;

    match deleted {
        Some(deleted_book) => Ok(HttpResponse::Ok().json(BookMessage {
            message: "Book Deleted successfully",
            deleted_book: Some(book::to_json(&deleted_book)),
            ..Default::default()
        })),
        None => Err(ApiError::NotFound("Book does not exist")),
    }
}
