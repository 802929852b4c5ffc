use actix_web::{middleware::NormalizePath, web};

use crate::handlers::{book, fallback};

/// Drops trailing slashes so `/books/` is served like `/books`.
pub fn normalize_path() -> NormalizePath {
    NormalizePath::trim()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(fallback::json_error))
        .service(
            web::resource("/books")
                .route(web::get().to(book::get_books))
                .route(web::post().to(book::add_book)),
        )
        .service(
            web::resource("/books/author/{author}")
                .route(web::get().to(book::get_books_by_author)),
        )
        .service(
            web::resource("/books/genre/{genre}")
                .route(web::get().to(book::get_books_by_genre)),
        )
        .service(
            web::resource("/books/publishedYear/{year}")
                .route(web::get().to(book::get_books_by_year)),
        )
        .service(
            web::resource("/books/title/{title}")
                .route(web::post().to(book::update_book_by_title)),
        )
        // One resource for the shared pattern: GET reads by title, POST and
        // DELETE address the id.
        .service(
            web::resource("/books/{key}")
                .route(web::get().to(book::get_book_by_title))
                .route(web::post().to(book::update_book_by_id))
                .route(web::delete().to(book::delete_book)),
        )
        .default_service(web::to(fallback::not_found));
}
