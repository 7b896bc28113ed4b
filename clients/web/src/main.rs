use actix_cors::Cors;
use actix_files::Files;
use actix_web::{
    delete, get,
    http::header::ContentType,
    middleware::{self, Condition},
    post,
    web::{self, Data},
    App, HttpResponse, HttpServer, Responder,
};
use actix_web_lab::respond::Html;
use clap::Parser;
use serde_json::json;
use std::{io, time::Duration};
use store::{
    consts::consts::ContactId,
    model::contact::NewContact,
    store::{
        options::StoreOptions,
        request_manager::{RequestManager, RequestManagerError},
        store::Store,
        table::ApplyErrors,
    },
};

use crate::views::FormData;

mod views;

/// Per worker view of the server settings that are not part of the store itself
#[derive(Clone)]
struct ServerConfig {
    remove_delay: Duration,
}

/// Full contact page -- triggered on first load / refresh
#[get("/")]
async fn index(request_manager: Data<RequestManager>) -> actix_web::Result<impl Responder> {
    let contacts = request_manager
        .send_list()
        .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(Html(views::render_index(&contacts, &FormData::new())))
}

/// Creates a contact from the submitted form. Success responds with a cleared
/// form plus the new contact as an out of band append, a duplicate email
/// responds with the form re-rendered around the submitted values and a field
/// error
#[post("/contacts")]
async fn create_contact(
    request_manager: Data<RequestManager>,
    form: web::Form<NewContact>,
) -> actix_web::Result<HttpResponse> {
    let new_contact = form.into_inner();

    match request_manager.send_add(new_contact.clone()) {
        Ok(contact) => {
            let body = format!(
                "{}{}",
                views::render_form(&FormData::new()),
                views::render_oob_contact(&contact)
            );

            Ok(HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(body))
        }
        Err(RequestManagerError::Statement(ApplyErrors::DuplicateEmail(_))) => {
            let form_data = FormData::new()
                .set_value("name", &new_contact.name)
                .set_value("email", &new_contact.email)
                .set_error("email", "Email already exists");

            Ok(HttpResponse::UnprocessableEntity()
                .content_type(ContentType::html())
                .body(views::render_form(&form_data)))
        }
        Err(other) => Err(actix_web::error::ErrorInternalServerError(other)),
    }
}

/// Removes a contact by id after the configured delay, which stands in for a
/// slow downstream dependency. The wait happens here in the handler so the
/// store stays free to serve other callers during it
#[delete("/contacts/{id}")]
async fn delete_contact(
    request_manager: Data<RequestManager>,
    config: Data<ServerConfig>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    tokio::time::sleep(config.remove_delay).await;

    let id = match path.into_inner().parse::<usize>() {
        Ok(id) => id,
        Err(_) => {
            return Ok(HttpResponse::BadRequest().json(json!({ "error": "Invalid ID" })));
        }
    };

    match request_manager.send_remove(ContactId(id)) {
        Ok(_) => Ok(HttpResponse::Ok().finish()),
        Err(RequestManagerError::Statement(ApplyErrors::NotFound(_))) => {
            Ok(HttpResponse::NotFound().json(json!({ "error": "Contact not found" })))
        }
        Err(other) => Err(actix_web::error::ErrorInternalServerError(other)),
    }
}

/// 📇 Contact book server, an htmx frontend backed by the in-memory contact store
#[derive(Parser, Debug)]
struct Cli {
    /// Port the http server will run on
    #[clap(short, long, default_value = "6969")]
    port: u16,

    /// Address the http server will run on
    #[clap(short, long, default_value = "0.0.0.0")]
    address: String,

    /// Directory the /css and /images mounts are served from
    #[clap(long, default_value = "assets")]
    assets: std::path::PathBuf,

    /// Milliseconds a remove waits before taking effect
    #[clap(long, default_value_t = 3000)]
    remove_delay_ms: u64,

    /// Logs every http request
    #[clap(long)]
    log_http: bool,

    #[clap(long, default_value_t = 2)]
    http_workers: usize,
}

/// The pair every store boots with, matching the walkthrough in the frontend
fn demo_seed() -> Vec<NewContact> {
    vec![
        NewContact::new("John Doe".to_string(), "johndoe@email.com".to_string()),
        NewContact::new("Claire Doe".to_string(), "clairedoe@email.com".to_string()),
    ]
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let store_options = StoreOptions::default().set_seed(demo_seed());

    let request_manager = Store::new(store_options).run();

    // Set up Ctrl-C handler
    let shutdown_request_manager = request_manager.clone();

    ctrlc::set_handler(move || {
        let shutdown_response = shutdown_request_manager
            .send_shutdown_request()
            .expect("Should not timeout");

        log::info!("Shutting down server: {}", shutdown_response);
    })
    .expect("Error setting Ctrl-C handler");

    let server_config = ServerConfig {
        remove_delay: Duration::from_millis(args.remove_delay_ms),
    };

    log::info!("Server is running at port {}", args.port);

    log::info!("Contacts page: http://{}:{}/", args.address, args.port);

    // Start HTTP server
    HttpServer::new(move || {
        let app = App::new()
            .app_data(Data::new(request_manager.clone()))
            .app_data(Data::new(server_config.clone()))
            .service(index)
            .service(create_contact)
            .service(delete_contact)
            .service(Files::new("/css", args.assets.join("css")))
            .service(Files::new("/images", args.assets.join("images")))
            .wrap(Cors::permissive())
            .wrap(Condition::new(args.log_http, middleware::Logger::default()));

        app
    })
    .workers(args.http_workers)
    .bind((args.address, args.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;

    use super::*;

    fn test_config(remove_delay_ms: u64) -> ServerConfig {
        ServerConfig {
            remove_delay: Duration::from_millis(remove_delay_ms),
        }
    }

    fn boot_seeded_store() -> RequestManager {
        Store::new(StoreOptions::default().set_seed(demo_seed())).run()
    }

    async fn read_body_string<B: actix_web::body::MessageBody>(
        response: actix_web::dev::ServiceResponse<B>,
    ) -> String {
        let bytes = test::read_body(response).await;

        String::from_utf8(bytes.to_vec()).expect("body should be utf8")
    }

    mod index_page {
        use super::*;

        #[actix_web::test]
        async fn lists_seed_contacts_in_seed_order() {
            // Given a store booted with the demo seed
            let rm = boot_seeded_store();

            let app = test::init_service(
                App::new()
                    .app_data(Data::new(rm.clone()))
                    .app_data(Data::new(test_config(0)))
                    .service(index),
            )
            .await;

            // When the page is requested
            let request = test::TestRequest::get().uri("/").to_request();
            let response = test::call_service(&app, request).await;

            // Then both seeds are rendered, oldest first
            assert_eq!(response.status(), StatusCode::OK);

            let body = read_body_string(response).await;

            let john = body.find("John Doe").expect("John should be rendered");
            let claire = body.find("Claire Doe").expect("Claire should be rendered");

            assert!(john < claire, "seed order should be preserved on the page");

            rm.send_shutdown_request().expect("Should not timeout");
        }
    }

    mod create {
        use super::*;

        #[actix_web::test]
        async fn returns_cleared_form_and_oob_fragment_then_lists_the_contact() {
            // Given a store booted with the demo seed
            let rm = boot_seeded_store();

            let app = test::init_service(
                App::new()
                    .app_data(Data::new(rm.clone()))
                    .app_data(Data::new(test_config(0)))
                    .service(index)
                    .service(create_contact),
            )
            .await;

            // When a contact with a fresh email is submitted
            let request = test::TestRequest::post()
                .uri("/contacts")
                .set_form(NewContact::new(
                    "Amy Doe".to_string(),
                    "amydoe@email.com".to_string(),
                ))
                .to_request();

            let response = test::call_service(&app, request).await;

            // Then the response carries a cleared form and the contact as an
            // out of band append
            assert_eq!(response.status(), StatusCode::OK);

            let body = read_body_string(response).await;

            assert!(body.contains("hx-swap-oob=\"beforeend\""));
            assert!(body.contains("Amy Doe"));
            assert!(body.contains("id=\"contact-3\""), "seeds hold ids 1 and 2");

            // The form inputs come back empty, the submitted values are only in
            // the appended contact row
            assert!(body.contains("value=\"\""));
            assert!(!body.contains("value=\"amydoe@email.com\""));

            // And a page reload includes the new contact
            let page_request = test::TestRequest::get().uri("/").to_request();
            let page_response = test::call_service(&app, page_request).await;
            let page_body = read_body_string(page_response).await;

            assert!(page_body.contains("Amy Doe"));

            rm.send_shutdown_request().expect("Should not timeout");
        }

        #[actix_web::test]
        async fn duplicate_email_echoes_values_with_a_field_error() {
            // Given a store booted with the demo seed
            let rm = boot_seeded_store();

            let app = test::init_service(
                App::new()
                    .app_data(Data::new(rm.clone()))
                    .app_data(Data::new(test_config(0)))
                    .service(create_contact),
            )
            .await;

            // When a contact reuses a seeded email
            let request = test::TestRequest::post()
                .uri("/contacts")
                .set_form(NewContact::new(
                    "John Again".to_string(),
                    "johndoe@email.com".to_string(),
                ))
                .to_request();

            let response = test::call_service(&app, request).await;

            // Then the form comes back unprocessable with the submitted values
            // and the field error
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

            let body = read_body_string(response).await;

            assert!(body.contains("Email already exists"));
            assert!(body.contains("value=\"John Again\""));
            assert!(body.contains("value=\"johndoe@email.com\""));

            // And nothing was stored
            assert_eq!(rm.send_list().expect("Should not timeout").len(), 2);

            rm.send_shutdown_request().expect("Should not timeout");
        }
    }

    mod delete {
        use super::*;

        #[actix_web::test]
        async fn removes_the_contact_then_misses_on_repeat() {
            // Given a store booted with the demo seed and no delete delay
            let rm = boot_seeded_store();

            let app = test::init_service(
                App::new()
                    .app_data(Data::new(rm.clone()))
                    .app_data(Data::new(test_config(0)))
                    .service(delete_contact),
            )
            .await;

            // When John is deleted
            let request = test::TestRequest::delete().uri("/contacts/1").to_request();
            let response = test::call_service(&app, request).await;

            // Then the delete succeeds and only Claire remains
            assert_eq!(response.status(), StatusCode::OK);

            let remaining = rm.send_list().expect("Should not timeout");
            assert_eq!(remaining.len(), 1);
            assert_eq!(remaining[0].name, "Claire Doe");

            // And deleting the same id again misses
            let repeat_request = test::TestRequest::delete().uri("/contacts/1").to_request();
            let repeat_response = test::call_service(&app, repeat_request).await;

            assert_eq!(repeat_response.status(), StatusCode::NOT_FOUND);

            let repeat_body = read_body_string(repeat_response).await;
            let payload: Value =
                serde_json::from_str(&repeat_body).expect("error body should be json");

            assert_eq!(payload, json!({ "error": "Contact not found" }));

            rm.send_shutdown_request().expect("Should not timeout");
        }

        #[actix_web::test]
        async fn malformed_id_is_rejected_before_reaching_the_store() {
            // Given a store booted with the demo seed
            let rm = boot_seeded_store();

            let app = test::init_service(
                App::new()
                    .app_data(Data::new(rm.clone()))
                    .app_data(Data::new(test_config(0)))
                    .service(delete_contact),
            )
            .await;

            // When the id is not a number
            let request = test::TestRequest::delete()
                .uri("/contacts/abc")
                .to_request();

            let response = test::call_service(&app, request).await;

            // Then the request is rejected as bad input and nothing was removed
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let body = read_body_string(response).await;
            let payload: Value = serde_json::from_str(&body).expect("error body should be json");

            assert_eq!(payload, json!({ "error": "Invalid ID" }));
            assert_eq!(rm.send_list().expect("Should not timeout").len(), 2);

            rm.send_shutdown_request().expect("Should not timeout");
        }

        #[actix_web::test]
        async fn store_stays_available_during_the_remove_delay() {
            // Given a delete delay that is long compared to an add
            let rm = boot_seeded_store();

            let app = test::init_service(
                App::new()
                    .app_data(Data::new(rm.clone()))
                    .app_data(Data::new(test_config(200)))
                    .service(create_contact)
                    .service(delete_contact),
            )
            .await;

            let delete_request = test::TestRequest::delete().uri("/contacts/1").to_request();

            let create_request = test::TestRequest::post()
                .uri("/contacts")
                .set_form(NewContact::new(
                    "Amy Doe".to_string(),
                    "amydoe@email.com".to_string(),
                ))
                .to_request();

            // When an add arrives while the delete is waiting out its delay
            let (delete_response, create_response) = tokio::join!(
                test::call_service(&app, delete_request),
                async {
                    tokio::time::timeout(
                        Duration::from_millis(100),
                        test::call_service(&app, create_request),
                    )
                    .await
                    .expect("add should not wait for the delete delay")
                }
            );

            // Then both complete, the add well inside the delete's delay window
            assert_eq!(delete_response.status(), StatusCode::OK);
            assert_eq!(create_response.status(), StatusCode::OK);

            let remaining = rm.send_list().expect("Should not timeout");

            assert_eq!(remaining.len(), 2, "Claire and Amy remain");
            assert!(remaining.iter().all(|contact| contact.name != "John Doe"));

            rm.send_shutdown_request().expect("Should not timeout");
        }
    }
}
