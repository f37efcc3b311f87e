use libiot_http::network::application::http::*;
use rand::Rng;

const SCENARIO_A: &[u8] = b"GET /x HTTP/1.1\r\nHost: h\r\n\r\n";

/// Serialize with the given chunk sizes, cycling through them until done.
fn chunked<L: Layout + ?Sized>(layout: &L, sizes: &[usize]) -> std::vec::Vec<u8> {
    let mut cursor = Cursor::new(layout);
    let mut out = std::vec::Vec::new();
    let mut buf = [0u8; 256];
    for &size in sizes.iter().cycle() {
        if cursor.eof() {
            break;
        }
        let progress = cursor.serialize(&mut buf[..size]).unwrap();
        assert_eq!(progress.written(), cursor.last_written());
        if !progress.is_done() {
            // A call that does not finish the value fills the whole buffer.
            assert_eq!(progress.written(), size);
        }
        out.extend_from_slice(&buf[..progress.written()]);
    }
    out
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn scenario_a() -> Request<'static> {
    let mut request = Request::new(Method::Get, "/x");
    request.headers.host = "h";
    request
}

#[test]
fn test_scenario_a_any_chunk_size() {
    let request = scenario_a();
    for size in 1..=SCENARIO_A.len() + 1 {
        assert_eq!(chunked(&request, &[size]), SCENARIO_A, "chunk size {size}");
    }
}

#[test]
fn test_random_partitions_match_single_pass() {
    let body = b"temperature=21.5&humidity=40";
    let len = content_length(body.len());
    let mut request = Request::new(Method::Post, "/api/v1/readings");
    request.general.connection = "close";
    request.headers.host = "sensors.local";
    request.headers.user_agent = "libiot-http";
    request.headers.accept = "*/*";
    request.entity.content_type = "application/x-www-form-urlencoded";
    request.entity.content_length = len.as_str();
    request.entity.extension = "X-Device: 7";
    request.body = body;

    let whole = request.to_vec::<512>().unwrap();
    assert_eq!(whole.len(), request.encoded_len());

    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let sizes: std::vec::Vec<usize> = (0..8).map(|_| rng.gen_range(1..=17)).collect();
        assert_eq!(chunked(&request, &sizes), &whole[..], "sizes {sizes:?}");
    }
}

#[test]
fn test_exact_buffer_finishes_in_one_call() {
    let request = scenario_a();
    let mut buf = [0u8; SCENARIO_A.len()];
    let mut cursor = request.cursor();
    assert_eq!(cursor.serialize(&mut buf), Ok(Progress::Done(SCENARIO_A.len())));
    assert!(cursor.eof());
    assert_eq!(&buf[..], SCENARIO_A);
}

#[test]
fn test_eof_flips_on_last_byte() {
    let request = scenario_a();
    let mut cursor = request.cursor();
    let mut buf = [0u8; 1];
    for i in 0..SCENARIO_A.len() {
        assert!(!cursor.eof());
        let progress = cursor.serialize(&mut buf).unwrap();
        assert_eq!(progress.is_done(), i == SCENARIO_A.len() - 1);
    }
    assert!(cursor.eof());
}

#[test]
fn test_empty_fields_are_elided() {
    let mut request = Request::new(Method::Get, "/");
    request.headers.if_range = "abc";
    request.entity.content_range = "bytes 0-1/2";
    let out = request.to_vec::<256>().unwrap();

    for (i, name) in RequestHeaders::NAMES.iter().enumerate() {
        let mut line = std::vec::Vec::from(&b"\r\n"[..]);
        line.extend_from_slice(RequestHeaders::LABELS[i].as_bytes());
        let set = *name == "If-Range";
        assert_eq!(contains(&out, &line), set, "{name}");
    }
    for name in GeneralHeaders::NAMES {
        assert!(!contains(&out, format!("\r\n{name}: ").as_bytes()), "{name}");
    }
    assert!(contains(&out, b"\r\nContent-Range: bytes 0-1/2\r\n"));
    assert!(!contains(&out, b"\r\nRange: "));
}

#[test]
fn test_every_field_in_declaration_order() {
    let values: std::vec::Vec<String> = (0..RequestHeaders::NAMES.len())
        .map(|i| format!("v{i}"))
        .collect();
    let mut request = Request::new(Method::Put, "/all");
    for (i, value) in values.iter().enumerate() {
        *request.headers.value_mut(i).unwrap() = value.as_str();
    }

    let mut expected = b"PUT /all HTTP/1.1\r\n".to_vec();
    for (i, name) in RequestHeaders::NAMES.iter().enumerate() {
        expected.extend_from_slice(format!("{name}: v{i}\r\n").as_bytes());
    }
    expected.extend_from_slice(b"\r\n");

    assert_eq!(chunked(&request, &[3, 1, 7]), expected);
}

#[test]
fn test_bag_order_general_request_entity() {
    let mut request = Request::new(Method::Get, "/");
    request.entity.allow = "GET";
    request.headers.accept = "*/*";
    request.general.via = "1.1 proxy";
    assert_eq!(
        &request.to_vec::<128>().unwrap()[..],
        b"GET / HTTP/1.1\r\nVia: 1.1 proxy\r\nAccept: */*\r\nAllow: GET\r\n\r\n"
    );
}

#[test]
fn test_serialize_after_eof() {
    let request = scenario_a();
    let mut cursor = request.cursor();
    let mut buf = [0xAAu8; 64];
    assert!(cursor.serialize(&mut buf).unwrap().is_done());

    let mut after = [0x55u8; 8];
    assert_eq!(cursor.serialize(&mut after), Err(SerializeError::AlreadyComplete));
    assert_eq!(cursor.last_written(), 0);
    assert_eq!(after, [0x55u8; 8]);
    assert_eq!(cursor.fail(), Some(SerializeError::AlreadyComplete));
    assert!(cursor.eof());
}

#[test]
fn test_zero_length_buffer_is_sticky() {
    let request = scenario_a();
    let mut cursor = request.cursor();
    assert_eq!(cursor.serialize(&mut []), Err(SerializeError::InvalidBuffer));
    assert_eq!(cursor.fail(), Some(SerializeError::InvalidBuffer));

    let mut buf = [0u8; 64];
    assert_eq!(cursor.serialize(&mut buf), Err(SerializeError::InvalidBuffer));
    assert_eq!(cursor.last_written(), 0);

    cursor.reset();
    assert_eq!(cursor.fail(), None);
    let progress = cursor.serialize(&mut buf).unwrap();
    assert_eq!(&buf[..progress.written()], SCENARIO_A);
}

#[test]
fn test_reset_restarts_from_first_byte() {
    let request = scenario_a();
    let mut cursor = request.cursor();
    let mut buf = [0u8; 10];
    cursor.serialize(&mut buf).unwrap();
    cursor.serialize(&mut buf).unwrap();

    cursor.reset();
    assert!(!cursor.eof());
    let mut whole = [0u8; 64];
    let n = cursor.serialize(&mut whole).unwrap().written();
    assert_eq!(&whole[..n], SCENARIO_A);
}

#[test]
fn test_response_chunked() {
    let mut response = Response::new(StatusCode::NOT_FOUND);
    response.general.date = "Thu, 01 Jan 1970 00:00:00 GMT";
    response.headers.server = "libiot";
    response.entity.content_length = "0";
    let expected: &[u8] = b"HTTP/1.1 404 Not Found\r\n\
        Date: Thu, 01 Jan 1970 00:00:00 GMT\r\n\
        Server: libiot\r\n\
        Content-Length: 0\r\n\
        \r\n";
    for size in [1, 2, 5, 64] {
        assert_eq!(chunked(&response, &[size]), expected);
    }
}

#[test]
fn test_plain_part_lists() {
    let parts: [&[u8]; 4] = [b"ab", b"", b"c", b""];
    assert_eq!(chunked(&parts, &[1]), b"abc");
    assert_eq!(parts.encoded_len(), 3);

    let empty: [&[u8]; 2] = [b"", b""];
    let mut cursor = Cursor::new(&empty);
    assert!(cursor.eof());
    assert_eq!(cursor.serialize(&mut [0u8; 4]), Err(SerializeError::AlreadyComplete));
}
