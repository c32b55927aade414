#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), arwu_importer_lib::ImportError> {
    arwu_importer_lib::run().await
}
