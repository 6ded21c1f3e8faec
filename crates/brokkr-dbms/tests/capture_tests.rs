//! Redirect capture server tests
//!
//! The listener serves exactly one request, hands the token back before the
//! response goes out, and is gone once the session resolves.

use brokkr_core::Error;
use brokkr_dbms::capture::run_capture_server;
use brokkr_dbms::CaptureSession;
use std::net::TcpStream;
use std::sync::mpsc;
use std::time::Duration;

#[test]
fn captures_token_from_callback_query() {
    let session = CaptureSession::spawn("127.0.0.1", 0).unwrap();
    let addr = session.addr();

    let request = std::thread::spawn(move || {
        let url = format!("http://{}/?authToken=tok-123", addr);
        reqwest::blocking::get(url).unwrap()
    });

    let token = session.wait(Duration::from_secs(5)).unwrap();
    assert_eq!(token, "tok-123");

    // The browser got feedback before the listener went away
    let response = request.join().unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().unwrap();
    assert!(body.contains("window.close()"));
    assert!(body.contains("You are authenticated"));
}

#[test]
fn callback_lands_on_arbitrary_path() {
    let session = CaptureSession::spawn("127.0.0.1", 0).unwrap();
    let addr = session.addr();

    let request = std::thread::spawn(move || {
        let url = format!("http://{}/oauth/redirect?authToken=tok-456", addr);
        reqwest::blocking::get(url).unwrap().status()
    });

    assert_eq!(session.wait(Duration::from_secs(5)).unwrap(), "tok-456");
    assert_eq!(request.join().unwrap(), 200);
}

#[test]
fn missing_token_fails_the_session_but_still_responds() {
    let session = CaptureSession::spawn("127.0.0.1", 0).unwrap();
    let addr = session.addr();

    let request = std::thread::spawn(move || {
        let url = format!("http://{}/?unrelated=1", addr);
        reqwest::blocking::get(url).unwrap().status()
    });

    let err = session.wait(Duration::from_secs(5)).unwrap_err();
    assert!(err.is_authentication());
    assert!(err.to_string().contains("Failed to authenticate"));

    // The client still saw a response page before teardown
    assert_eq!(request.join().unwrap(), 401);
}

#[test]
fn timeout_tears_down_the_listener() {
    let session = CaptureSession::spawn("127.0.0.1", 0).unwrap();
    let addr = session.addr();

    let err = session.wait(Duration::from_millis(200)).unwrap_err();
    assert!(matches!(err, Error::AuthenticationTimeout { .. }));

    // wait() joined the listener thread; nothing is accepting anymore
    assert!(TcpStream::connect(addr).is_err());
}

#[tokio::test]
async fn serving_on_the_callers_runtime_is_rejected() {
    let (result_tx, _result_rx) = mpsc::channel();
    let (_shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let (bound_tx, _bound_rx) = mpsc::channel();

    let err = run_capture_server("127.0.0.1:0", result_tx, shutdown_rx, bound_tx).unwrap_err();
    assert!(matches!(err, Error::NotSupported { .. }));
}

#[test]
fn bind_failure_surfaces_from_spawn() {
    // Hold the port so the second bind fails
    let holder = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = holder.local_addr().unwrap().port();

    let err = CaptureSession::spawn("127.0.0.1", port).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
