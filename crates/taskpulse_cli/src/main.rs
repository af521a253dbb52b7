//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskpulse_core` linkage and
//!   storage bootstrap.

fn main() {
    println!("taskpulse_core version={}", taskpulse_core::core_version());
    match taskpulse_core::db::open_db_in_memory() {
        Ok(_) => println!("taskpulse_core storage=ok"),
        Err(err) => {
            eprintln!("taskpulse_core storage=error {err}");
            std::process::exit(1);
        }
    }
}
