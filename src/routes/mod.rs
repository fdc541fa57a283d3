pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").service(auth::login))
        .service(
            web::scope("/users")
                .service(users::list_users)
                .service(users::create_user),
        )
        .service(
            web::scope("/tasks")
                .service(tasks::list_tasks)
                // `/my` must register before the `/{id}` matchers.
                .service(tasks::my_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::update_status)
                .service(tasks::delete_task),
        );
}
