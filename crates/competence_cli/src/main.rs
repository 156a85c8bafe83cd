//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `competence_core` linkage
//!   and storage bootstrap.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("competence_core version={}", competence_core::core_version());

    match competence_core::db::open_db_in_memory() {
        Ok(_) => println!("storage=ok"),
        Err(err) => {
            eprintln!("storage=error {err}");
            std::process::exit(1);
        }
    }
}
