//! src/startup.rs

use crate::configurations::{Settings, UploadSettings};
use crate::cors::{cors_policy, is_granted_preflight};
use crate::email_client::{Mailer, SmtpMailer};
use crate::routes::{contact_preflight, health_check, method_not_allowed, submit_contact_form};
use actix_web::dev::Server;
use actix_web::{guard, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub fn build(configuration: Settings) -> Result<Self, std::io::Error> {
        let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(configuration.email.clone()));
        Self::build_with_mailer(configuration, mailer)
    }

    pub fn build_with_mailer(
        configuration: Settings,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, std::io::Error> {
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            mailer,
            configuration.application.allowed_origins,
            configuration.uploads,
        )?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    mailer: Arc<dyn Mailer>,
    allowed_origins: Vec<String>,
    uploads: UploadSettings,
) -> Result<Server, std::io::Error> {
    let mailer = web::Data::from(mailer);
    let uploads = web::Data::new(uploads);
    let allowed_origins = Arc::new(allowed_origins);

    let server = HttpServer::new(move || {
        let preflight_origins = allowed_origins.clone();
        App::new()
            .wrap(TracingLogger::default())
            // `actix-cors` answers a preflight it refuses with a 400. Every
            // OPTIONS on the contact route that it would refuse (no Origin,
            // unknown origin, missing or unserved request method) is matched
            // here first and gets a bare 200 without CORS headers.
            .service(
                web::resource("/api/contact")
                    .guard(guard::Options())
                    .guard(guard::fn_guard(move |ctx| {
                        !is_granted_preflight(ctx.head().headers(), &preflight_origins)
                    }))
                    .to(contact_preflight),
            )
            .service(
                web::scope("/api")
                    .wrap(cors_policy(allowed_origins.clone()))
                    .route("/health", web::get().to(health_check))
                    .service(
                        // Granted preflights never reach the resource, the
                        // CORS middleware replies to them itself.
                        web::resource("/contact")
                            .route(web::post().to(submit_contact_form))
                            .default_service(web::to(method_not_allowed)),
                    ),
            )
            .app_data(mailer.clone())
            .app_data(uploads.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
