use chrono::NaiveDateTime;
use rand::{Rng, seq::IndexedRandom};

const METHODS: [(&str, u8); 4] = [("GET", 10), ("POST", 4), ("PUT", 2), ("DELETE", 1)];
const PATHS: [(&str, u8); 7] = [
    ("/api/v1/users", 50),
    ("/api/v1/orders", 30),
    ("/api/v1/search", 20),
    ("/api/v1/login", 10),
    ("/api/v1/reports/daily", 5),
    ("/health", 10),
    ("/admin", 2),
];
const STATUS: [(u16, u8); 6] = [
    (200, 60),
    (201, 15),
    (204, 5),
    (400, 10),
    (404, 20),
    (500, 3),
];

/// One line in the grammar the analyzer parses:
/// `<ip> - - [<timestamp> +0000] <method> <path> <status> <size> <seconds>`
pub fn generate_access_log<R: Rng + ?Sized>(rng: &mut R, timestamp: NaiveDateTime) -> String {
    let ip = format!(
        "192.168.{}.{}",
        rng.random_range(0..256),
        rng.random_range(0..256)
    );
    let stamp = timestamp.format("%d/%b/%Y:%H:%M:%S");
    let method = METHODS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let path = PATHS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let status = STATUS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let size = rng.random_range(100..2000);
    let duration = rng.random_range(0.001..2.5f64);

    format!("{ip} - - [{stamp} +0000] {method} {path} {status} {size} {duration:.4}")
}
