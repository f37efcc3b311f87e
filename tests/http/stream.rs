use core::time::Duration;

use libiot_http::network::application::http::*;
use libiot_http::network::error::Error as NetError;

use crate::mock::{MockConnection, TestClock};

type Link<'a> = StreamTransport<'a, MockConnection, 128>;

fn id(raw: u32) -> RequestId {
    RequestId::new(raw).unwrap()
}

#[test]
fn test_exchange_over_connection() {
    let table: RequestTable<1> = RequestTable::new();
    let client: Client<'_, Link<'_>, TestClock, 16> = Client::new(
        StreamTransport::new(MockConnection::new()),
        TestClock::new(),
        &table,
        Config::default(),
    )
    .unwrap();

    let mut request = Request::new(Method::Get, "/firmware/version");
    request.headers.host = "ota.local";
    request.headers.accept = "text/plain";
    let mut response = Response::default();
    let mut promise = client.submit(&request, &mut response);
    assert!(promise.is_attached());

    client.with_transport(|t| {
        assert_eq!(t.active(), promise.id());
        assert_eq!(
            &t.connection().writes[..],
            &request.to_vec::<128>().unwrap()[..]
        );
    });

    // Nothing readable yet.
    assert_eq!(client.with_transport(|t| t.poll()), Ok(0));
    assert_eq!(promise.wait(Duration::from_millis(5)), Err(Error::Timeout));

    let reply = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\n1.4.2";
    client.with_transport(|t| t.connection_mut().set_read_data(reply));
    assert_eq!(client.with_transport(|t| t.poll()), Ok(reply.len()));
    assert_eq!(promise.state(), State::Readable);
    assert_eq!(promise.available(), reply.len());
    promise.wait(Duration::from_millis(100)).unwrap();

    let mut raw = heapless::Vec::<u8, 128>::new();
    assert_eq!(promise.read_into(&mut raw), Ok(reply.len()));
    assert_eq!(client.with_transport(|t| t.buffered()), 0);

    let parsed = Response::parse_head(&raw).unwrap();
    assert!(parsed.status.success());
    assert_eq!(parsed.body, b"1.4.2");

    promise.release().unwrap();
    assert_eq!(client.with_transport(|t| t.active()), None);
}

#[test]
fn test_data_buffered_before_registration_is_signalled() {
    let table: RequestTable<1> = RequestTable::new();
    let mut link: Link<'_> = StreamTransport::new(MockConnection::new());
    // A fresh client numbers its first request 1; bind the link to it early.
    link.send(id(1), b"").unwrap();
    link.connection_mut().set_read_data(b"HTTP/1.1 204 No Content\r\n\r\n");
    assert_eq!(link.poll(), Ok(27));

    let client: Client<'_, Link<'_>, TestClock> =
        Client::new(link, TestClock::new(), &table, Config::default()).unwrap();
    let mut request = Request::new(Method::Head, "/");
    request.headers.host = "h";
    let mut response = Response::default();

    let mut promise = client.submit(&request, &mut response);
    assert_eq!(promise.id(), Some(id(1)));
    assert_eq!(promise.wait(Duration::from_millis(100)), Ok(()));
    let mut buf = [0u8; 64];
    assert_eq!(promise.read(&mut buf), Ok(27));
}

#[test]
fn test_idle_link_discards_stray_bytes() {
    let mut link: Link<'_> = StreamTransport::new(MockConnection::new());
    link.connection_mut().set_read_data(&[b'x'; 100]);

    assert_eq!(link.poll(), Ok(0));
    assert_eq!(link.buffered(), 0);
    assert!(link.connection().rx.is_empty());
}

#[test]
fn test_late_reply_to_dropped_request_is_not_delivered() {
    let table: RequestTable<1> = RequestTable::new();
    let client: Client<'_, Link<'_>, TestClock> = Client::new(
        StreamTransport::new(MockConnection::new()),
        TestClock::new(),
        &table,
        Config::default(),
    )
    .unwrap();

    let mut first = Request::new(Method::Get, "/a");
    first.headers.host = "h";
    let mut abandoned = Response::default();
    let promise = client.submit(&first, &mut abandoned);
    assert!(promise.is_attached());
    drop(promise);

    // The answer to /a only shows up after the request was dropped.
    let late = b"HTTP/1.1 500 OLD\r\n\r\n";
    client.with_transport(|t| t.connection_mut().set_read_data(late));
    assert_eq!(client.with_transport(|t| t.poll()), Ok(0));

    let mut second = Request::new(Method::Get, "/b");
    second.headers.host = "h";
    let mut response = Response::default();
    let mut promise = client.submit(&second, &mut response);
    assert!(promise.is_attached());
    assert_eq!(promise.available(), 0);
    assert_eq!(promise.wait(Duration::from_millis(5)), Err(Error::Timeout));
    let mut buf = [0u8; 64];
    assert_eq!(promise.read(&mut buf), Ok(0));

    let reply = b"HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\nb";
    client.with_transport(|t| t.connection_mut().set_read_data(reply));
    assert_eq!(client.with_transport(|t| t.poll()), Ok(reply.len()));
    promise.wait(Duration::from_millis(100)).unwrap();

    let mut raw = heapless::Vec::<u8, 128>::new();
    assert_eq!(promise.read_into(&mut raw), Ok(reply.len()));
    assert_eq!(&raw[..], reply);
    let parsed = Response::parse_head(&raw).unwrap();
    assert_eq!(parsed.status.code(), 200);
    assert_eq!(parsed.body, b"b");
}

#[test]
fn test_short_writes_are_retried() {
    let mut connection = MockConnection::new();
    connection.max_write = 3;
    let mut link: Link<'_> = StreamTransport::new(connection);

    let bytes = b"GET / HTTP/1.1\r\n\r\n";
    assert_eq!(link.send(id(1), bytes), Ok(()));
    assert_eq!(&link.connection().writes[..], bytes);
}

#[test]
fn test_one_request_at_a_time() {
    let mut link: Link<'_> = StreamTransport::new(MockConnection::new());
    assert_eq!(link.send(id(1), b"a"), Ok(()));
    assert_eq!(link.active(), Some(id(1)));

    assert_eq!(link.send(id(2), b"b"), Err(NetError::UnknownRequest));
    assert_eq!(link.read(id(2), &mut [0u8; 4]), Err(NetError::UnknownRequest));
    assert_eq!(link.unregister_notify(id(2)), Err(NetError::UnknownRequest));
    assert_eq!(link.available(id(2)), 0);

    assert_eq!(link.unregister_notify(id(1)), Ok(()));
    assert_eq!(link.send(id(2), b"b"), Ok(()));
    assert_eq!(&link.into_inner().writes[..], b"ab");
}

#[test]
fn test_unregister_discards_buffered_data() {
    let mut link: Link<'_> = StreamTransport::new(MockConnection::new());
    link.send(id(1), b"x").unwrap();
    link.connection_mut().set_read_data(b"stale");
    assert_eq!(link.poll(), Ok(5));

    link.unregister_notify(id(1)).unwrap();
    assert_eq!(link.buffered(), 0);
    assert_eq!(link.active(), None);
}

#[test]
fn test_receive_buffer_bounds_poll() {
    let mut link: StreamTransport<'_, MockConnection, 4> = StreamTransport::new(MockConnection::new());
    link.send(id(1), b"x").unwrap();
    link.connection_mut().set_read_data(b"abcdef");

    assert_eq!(link.poll(), Ok(4));
    assert_eq!(link.poll(), Ok(0));

    let mut buf = [0u8; 3];
    assert_eq!(link.read(id(1), &mut buf), Ok(3));
    assert_eq!(&buf, b"abc");
    assert_eq!(link.poll(), Ok(2));
    assert_eq!(link.read(id(1), &mut buf), Ok(3));
    assert_eq!(&buf, b"def");
}

#[test]
fn test_closed_connection() {
    let mut connection = MockConnection::new();
    connection.is_open = false;
    let mut link: Link<'_> = StreamTransport::new(connection);

    assert_eq!(link.poll(), Err(NetError::ReadError));
    assert_eq!(link.send(id(1), b"x"), Err(NetError::WriteError));
}
