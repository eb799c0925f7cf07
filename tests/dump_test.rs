//! Pipeline behaviour with the traffic dump switched on.
//!
//! Lives in its own test binary because the toggle is process-wide.

use bytes::Bytes;
use http::{Request, Response};
use restclient::transport::TransportFn;
use restclient::{dump_requests_enabled, set_dump_requests, Body, BoxError, Client, ErrorKind, RequestBody};
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_dump_keeps_bodies_readable() {
    set_dump_requests(true);
    assert!(dump_requests_enabled());

    let received = Arc::new(Mutex::new(Bytes::new()));
    let sink = received.clone();
    let client = Client::builder()
        .endpoint("http://h")
        .transport(TransportFn::new(move |req: Request<Body>| {
            let sink = sink.clone();
            async move {
                let body = req.into_body().bytes().await?;
                *sink.lock().unwrap() = body;
                Ok::<_, BoxError>(Response::new(Body::from_stream(futures::stream::iter(vec![
                    Ok::<_, io::Error>(Bytes::from_static(b"{\"id\":")),
                    Ok(Bytes::from_static(b"7}")),
                ]))))
            }
        }))
        .build()
        .unwrap();

    let chunks = futures::stream::iter(vec![
        Ok(Bytes::from_static(b"{\"name\":")),
        Ok(Bytes::from_static(b"\"w\"}")),
    ]);
    let mut created: HashMap<String, u32> = HashMap::new();
    client
        .post("/items")
        .query_pair("token", "t")
        .body(RequestBody::stream(chunks))
        .decode_into(&mut created)
        .send()
        .await
        .unwrap();

    assert_eq!(*received.lock().unwrap(), Bytes::from_static(b"{\"name\":\"w\"}"));
    assert_eq!(created.get("id"), Some(&7));
}

#[tokio::test]
async fn test_dump_with_failing_response_body() {
    set_dump_requests(true);

    let client = Client::builder()
        .endpoint("http://h")
        .transport(TransportFn::new(|_req: Request<Body>| async {
            let chunks = vec![
                Ok(Bytes::from_static(b"{")),
                Err(io::Error::new(io::ErrorKind::ConnectionAborted, "aborted")),
            ];
            Ok::<_, BoxError>(
                Response::builder()
                    .status(500)
                    .body(Body::from_stream(futures::stream::iter(chunks)))
                    .unwrap(),
            )
        }))
        .build()
        .unwrap();

    // the drain fails, the original body still reports the read error
    let err = client.get("/items").send().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResponseRead);
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_dump_with_success_target_and_failing_body() {
    set_dump_requests(true);

    let client = Client::builder()
        .endpoint("http://h")
        .transport(TransportFn::new(|_req: Request<Body>| async {
            // ends right after the error, like a hyper body
            let chunks = vec![
                Ok(Bytes::from_static(b"{\"id\":")),
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
            ];
            Ok::<_, BoxError>(Response::new(Body::from_stream(futures::stream::iter(chunks))))
        }))
        .build()
        .unwrap();

    let mut target: HashMap<String, u32> = HashMap::new();
    let err = client
        .get("/items/1")
        .decode_into(&mut target)
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResponseRead);
    assert_eq!(err.status_code(), 200);
    assert!(target.is_empty());
}
