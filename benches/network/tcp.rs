use criterion::{Criterion, Throughput};
use libconn::config::Options;
use libconn::network::manager::ConnectionManager;
use libconn::network::{Read, Write};
use std::io::{Read as StdRead, Write as StdWrite};
use std::net::TcpListener;
use std::thread;

pub fn bench_loopback_round_trip(c: &mut Criterion) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind loopback listener");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut buf = [0u8; 4096];
            loop {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if stream.write_all(&buf[..n]).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });

    let manager = ConnectionManager::new(Options::default());
    let mut conn = manager
        .open_tcp("127.0.0.1", port)
        .expect("Failed to connect to echo server");

    let payload = b"hello from the loopback benchmark";
    let mut group = c.benchmark_group("tcp");
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("echo_round_trip", |b| {
        b.iter(|| {
            conn.write(payload).unwrap();
            let mut buf = [0u8; 64];
            let mut got = 0;
            while got < payload.len() {
                got += conn.read(&mut buf[got..]).unwrap();
            }
            got
        })
    });
    group.finish();
}
