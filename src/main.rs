#[tokio::main]
async fn main() {
    if let Err(e) = futcerto::run().await {
        eprintln!("futcerto: {e}");
        std::process::exit(1);
    }
}
