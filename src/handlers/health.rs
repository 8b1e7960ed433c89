/// Plain-text liveness probe served at `/`.
pub async fn health_check() -> &'static str {
    "SpoTICfy API working!"
}
