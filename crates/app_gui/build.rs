use std::env;

fn main() {
    let version = env::var("POSTER_GENRE_VERSION")
        .or_else(|_| env::var("CARGO_PKG_VERSION"))
        .unwrap_or_else(|_| "dev".to_string());
    println!("cargo:rerun-if-env-changed=POSTER_GENRE_VERSION");
    println!("cargo:rustc-env=POSTER_GENRE_VERSION={version}");
}
