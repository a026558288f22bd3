use std::io::{BufReader, Read, Write};
use std::net::{Shutdown, TcpStream, TcpListener};
use std::thread;

use lightwire::http::{ChunkedEncoder, HttpReader, Method, ResponseHead};

use log::debug;

#[test]
fn sync_keep_alive() {
    let _ = env_logger::builder().is_test(true).try_init();

    let lis = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = lis.local_addr().unwrap();

    let t1 = thread::spawn(move || {
        let (tcp, _) = lis.accept().unwrap();
        let mut writer = tcp.try_clone().unwrap();
        let mut reader = HttpReader::new(BufReader::with_capacity(16, tcp));

        let mut served = 0;
        while let Some(request) = reader.read_request().unwrap() {
            debug!("server: {} {}", request.method, request.target);

            // only posted bodies are read, the rest is skipped
            let mut body = Vec::new();
            if request.method == Method::Post {
                reader.body().read_to_end(&mut body).unwrap();
            }

            ResponseHead::new(200, "OK")
                .with_header("Transfer-Encoding", "chunked")
                .encode(&mut writer)
                .unwrap();
            let mut encoder = ChunkedEncoder::new(&mut writer);
            encoder.write_all(request.path().as_bytes()).unwrap();
            encoder.write_all(&body).unwrap();
            encoder.finish().unwrap();
            served += 1;
        }
        served
    });

    let t2 = thread::spawn(move || {
        let mut tcp = TcpStream::connect(addr).unwrap();
        tcp.write_all(
            b"GET /a HTTP/1.1\r\nContent-Length: 11\r\n\r\nhello world\
            POST /b HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n3\r\n:hi\r\n0\r\n\r\n\
            GET /c HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nskip\r\n0\r\nX-T: 1\r\n\r\n",
        )
        .unwrap();
        tcp.shutdown(Shutdown::Write).unwrap();

        let mut reader = HttpReader::new(BufReader::new(tcp));
        let mut bodies = Vec::new();
        while let Some(response) = reader.read_response().unwrap() {
            assert_eq!(response.status, 200);
            let mut body = String::new();
            reader.body().read_to_string(&mut body).unwrap();
            bodies.push(body);
        }
        bodies
    });

    let bodies = t2.join().unwrap();
    assert_eq!(bodies, vec!["/a", "/b:hi", "/c"]);
    assert_eq!(t1.join().unwrap(), 3);
}
