#[tokio::main]
async fn main() {
    if let Err(e) = curalink_lib::run().await {
        eprintln!("curalink: {e}");
        std::process::exit(1);
    }
}
