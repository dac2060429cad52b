//! Output format tests.
//!
//! For any successful `image` call the result SHALL be a single MCP content
//! item: text for URLs and JSON payloads, image content with an `image/*`
//! MIME type for downloads.

use rmcp::model::{CallToolResult, Content, RawContent};

/// Validates that a CallToolResult has valid content format.
fn validate_tool_result(result: &CallToolResult) -> Result<(), String> {
    if result.is_error.unwrap_or(false) {
        return Err("Successful result should not be flagged as an error".to_string());
    }
    if result.content.len() != 1 {
        return Err(format!("Expected exactly one content item, got {}", result.content.len()));
    }
    validate_content(&result.content[0])
}

/// Validates that a Content item has valid structure.
fn validate_content(content: &Content) -> Result<(), String> {
    match &content.raw {
        RawContent::Text(text_content) => {
            if text_content.text.is_empty() {
                return Err("Text content should not be empty".to_string());
            }
            Ok(())
        }
        RawContent::Image(image_content) => {
            if image_content.data.is_empty() {
                return Err("Image content should have data".to_string());
            }
            if !image_content.mime_type.starts_with("image/") {
                return Err(format!(
                    "Image content should have image/* mime type, got: {}",
                    image_content.mime_type
                ));
            }
            Ok(())
        }
        _ => Err("Unexpected content type".to_string()),
    }
}

fn text_of(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        RawContent::Text(text) => &text.text,
        other => panic!("expected text content, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picsum_mcp_common::Config;
    use picsum_mcp_image::{ImageFormat, ImageParams, OutputKind, PicsumServer};

    fn server() -> PicsumServer {
        PicsumServer::new(Config::default()).expect("server should build")
    }

    #[test]
    fn test_validate_content_rejects_empty() {
        assert!(validate_content(&Content::text("")).is_err());
        assert!(validate_content(&Content::image("", "image/png")).is_err());
        assert!(validate_content(&Content::image("AAAA", "text/plain")).is_err());
        assert!(validate_content(&Content::image("AAAA", "image/png")).is_ok());
    }

    #[tokio::test]
    async fn test_url_result_is_single_text_item() {
        let result = server()
            .image(ImageParams {
                id: Some("870".to_string()),
                width: Some(200),
                height: Some(300),
                seed: Some("test-seed".to_string()),
                grayscale: Some(true),
                blur: Some(2),
                format: Some(ImageFormat::Webp),
                output: OutputKind::Url,
                ..Default::default()
            })
            .await
            .expect("url generation should succeed");

        validate_tool_result(&result).unwrap();
        assert_eq!(
            text_of(&result),
            "https://picsum.photos/id/870/200/300?seed=test-seed&grayscale&blur=2&fmt=webp"
        );
    }

    #[tokio::test]
    async fn test_seed_info_result_is_pretty_json() {
        let result = server()
            .image(ImageParams {
                info: Some(true),
                seed: Some("abc".to_string()),
                width: Some(300),
                ..Default::default()
            })
            .await
            .expect("seed info should succeed");

        validate_tool_result(&result).unwrap();
        let text = text_of(&result);
        let expected = serde_json::json!({
            "seed": "abc",
            "url": "https://picsum.photos/300?seed=abc",
            "width": 300,
            "height": 300,
            "message": picsum_mcp_image::handler::SEED_INFO_MESSAGE
        });
        assert_eq!(serde_json::from_str::<serde_json::Value>(text).unwrap(), expected);
        assert!(text.contains("\n  \"seed\": \"abc\""), "expected 2-space indentation: {}", text);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use picsum_mcp_common::Config;
    use picsum_mcp_image::{ImageParams, PicsumServer};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn generated_urls_are_valid_text(
            width in proptest::option::of(1u64..=2000),
            height in proptest::option::of(1u64..=2000),
            grayscale in proptest::option::of(any::<bool>())
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let server = PicsumServer::new(Config::default()).unwrap();
            let params = ImageParams { width, height, grayscale, ..Default::default() };
            let result = runtime.block_on(server.image(params)).unwrap();

            prop_assert!(validate_tool_result(&result).is_ok());
            prop_assert!(text_of(&result).starts_with("https://picsum.photos/"));
        }
    }
}
