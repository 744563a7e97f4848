use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ReindexResponseDto {
    pub success: bool,
    pub message: String,
    pub count: usize,
}
