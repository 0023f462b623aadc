use crate::db::PgPool;
use crate::graphql::build_schema;
use crate::routes::{
    graphql::{graphiql, graphql},
    health_check::health_check,
};
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

/**************************************************************/
// Application State re reuse the same code in main and tests
/***************************************************************/
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Binds `host:port`; port 0 picks a free port, which tests rely on.
    pub async fn build(host: &str, port: u16, pool: PgPool) -> Result<Self, std::io::Error> {
        let address = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&address)?;
        let actual_port = listener.local_addr()?.port();

        let server = run_server(listener, pool)?;
        Ok(Self {
            port: actual_port,
            server,
        })
    }
    pub fn port(&self) -> u16 {
        self.port
    }
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/******************************************/
// Running Server
/******************************************/
pub fn run_server(listener: TcpListener, pool: PgPool) -> Result<Server, std::io::Error> {
    let schema = web::Data::new(build_schema(pool));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(schema.clone())
            .route("/health_check", web::get().to(health_check))
            .route("/graphql", web::post().to(graphql))
            .route("/graphql", web::get().to(graphiql))
    })
    .listen(listener)?
    .run();
    Ok(server)
}
