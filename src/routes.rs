use actix_web::web;

use crate::auth::{login, logout, session, signup};
use crate::dashboard;
use crate::preferences::{get_preferences, initialize_preferences, update_preferences};
use crate::tags::{create_tag, delete_tag, list_tag_names, list_task_tags, update_tag};
use crate::tasks::{
    create_task, delete_task, get_task, list_by_priority, list_by_status, list_overdue,
    list_tasks, task_counts, update_task,
};

/// The whole route table. Shared by the server binary and the test
/// harness so both drive the same application.
///
/// Fixed segments (`/counts`, `/overdue`, ...) are registered before the
/// `/{task_id}` captures that would otherwise swallow them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(signup))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/session", web::get().to(session)),
    )
    .service(
        web::scope("/tasks")
            .route("", web::post().to(create_task))
            .route("", web::get().to(list_tasks))
            .route("/counts", web::get().to(task_counts))
            .route("/overdue", web::get().to(list_overdue))
            .route("/status/{status}", web::get().to(list_by_status))
            .route("/priority/{priority}", web::get().to(list_by_priority))
            .service(
                web::scope("/{task_id}")
                    .route("", web::get().to(get_task))
                    .route("", web::put().to(update_task))
                    .route("", web::delete().to(delete_task))
                    .service(
                        web::scope("/tags")
                            .route("", web::post().to(create_tag))
                            .route("", web::get().to(list_task_tags)),
                    ),
            ),
    )
    .service(
        web::scope("/tags")
            .route("/names", web::get().to(list_tag_names))
            .route("/{tag_id}", web::put().to(update_tag))
            .route("/{tag_id}", web::delete().to(delete_tag)),
    )
    .service(
        web::scope("/preferences")
            .route("", web::get().to(get_preferences))
            .route("", web::put().to(update_preferences))
            .route("/initialize", web::post().to(initialize_preferences)),
    )
    .service(
        web::scope("/dashboard")
            .route("/summary", web::get().to(dashboard::summary))
            .route("/recent", web::get().to(dashboard::recent)),
    );
}
