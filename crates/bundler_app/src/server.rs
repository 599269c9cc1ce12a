//! The one HTTP route of the service: POST / with a JSON body, answered with
//! either a plain-text error or the finished archive.

use std::sync::Arc;

use bytes::Bytes;
use warp::http::{Response, StatusCode};
use warp::hyper::Body;
use warp::Filter;

use bundler_engine::{BundleService, ServiceResponse};

/// Serves the bundling route until the process is stopped.
pub async fn run(service: BundleService, port: u16) {
    let service = Arc::new(service);
    let route = warp::post()
        .and(warp::path::end())
        .and(warp::body::bytes())
        .then(move |body: Bytes| {
            let service = Arc::clone(&service);
            async move { into_reply(service.handle(&body).await) }
        });

    warp::serve(route).run(([0, 0, 0, 0], port)).await;
}

fn into_reply(response: ServiceResponse) -> Response<Body> {
    let mut builder = Response::builder()
        .status(response.status)
        .header("Content-Type", response.content_type);
    if let Some(disposition) = response.content_disposition {
        builder = builder.header("Content-Disposition", disposition);
    }
    builder.body(Body::from(response.body)).unwrap_or_else(|err| {
        // A requested filename can carry bytes that are not a legal header
        // value; answer with a bare 500 instead of dropping the connection.
        log::error!("could not build reply: {err}");
        let mut fallback = Response::new(Body::empty());
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}
