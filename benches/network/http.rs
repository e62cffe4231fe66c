use criterion::{BatchSize, Criterion, Throughput};
use libconn::network::application::http::client::read_to_end;
use libconn::network::application::http::{Request, Response};
use libconn::network::{Close, ConnError, Connection, Read, Write};
use rand::Rng;
use std::hint::black_box;

/// Serves a fixed byte buffer in reads of at most `chunk` bytes.
struct MemoryConnection {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl Read for MemoryConnection {
    type Error = ConnError;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for MemoryConnection {
    type Error = ConnError;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MemoryConnection {
    type Error = ConnError;
    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for MemoryConnection {}

fn random_response(body_len: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let mut response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {body_len}\r\n\r\n"
    )
    .into_bytes();
    response.extend((0..body_len).map(|_| rng.r#gen::<u8>()));
    response
}

pub fn bench_encode_request(c: &mut Criterion) {
    let request = Request::get("/api/v1/sensors/temperature?window=60", "192.168.10.20");
    c.bench_function("http/encode_request", |b| {
        b.iter(|| black_box(request).encode().unwrap())
    });
}

pub fn bench_parse_response(c: &mut Criterion) {
    let response = random_response(1024);
    let mut group = c.benchmark_group("http/parse_response");
    group.throughput(Throughput::Bytes(response.len() as u64));
    group.bench_function("1KiB", |b| {
        b.iter(|| Response::parse(black_box(&response)).unwrap().status_code)
    });
    group.finish();
}

pub fn bench_read_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("http/read_to_end");
    for (label, body_len, chunk) in [("64KiB/1460", 64 * 1024, 1460), ("1MiB/4096", 1024 * 1024, 4096)] {
        let response = random_response(body_len);
        group.throughput(Throughput::Bytes(response.len() as u64));
        group.bench_function(label, |b| {
            b.iter_batched(
                || MemoryConnection {
                    data: response.clone(),
                    pos: 0,
                    chunk,
                },
                |mut conn| {
                    let mut out = Vec::new();
                    read_to_end(&mut conn, &mut out, false).unwrap()
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}
