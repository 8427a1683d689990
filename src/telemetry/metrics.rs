use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::LazyLock;

pub static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("favorites-service"));

pub static HTTP_REQUESTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("http.server.requests")
        .with_description("Total HTTP requests served")
        .with_unit("{request}")
        .build()
});

pub static HTTP_REQUEST_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("http.server.duration")
        .with_description("HTTP request latency")
        .with_unit("ms")
        .build()
});

pub static FAVORITES_ADDED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("favorites.added")
        .with_description("Total favorites added")
        .build()
});

pub static FAVORITES_REMOVED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("favorites.removed")
        .with_description("Total favorite records removed")
        .build()
});

pub static CACHE_HITS: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("favorites.cache.hits")
        .with_description("Reads served from the favorites cache")
        .build()
});

pub static CACHE_MISSES: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("favorites.cache.misses")
        .with_description("Reads that had to load from the store")
        .build()
});
