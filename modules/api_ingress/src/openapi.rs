use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};

/// Merge per-module documents under one `info` block.
pub fn compose<I>(title: &str, version: &str, docs: I) -> OpenApi
where
    I: IntoIterator<Item = OpenApi>,
{
    let mut root = OpenApiBuilder::new()
        .info(InfoBuilder::new().title(title).version(version).build())
        .build();
    for doc in docs {
        root.merge(doc);
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::path::{HttpMethod, OperationBuilder, PathItem, PathsBuilder};

    #[test]
    fn compose_keeps_paths_of_every_module() {
        let a = OpenApiBuilder::new()
            .paths(PathsBuilder::new().path(
                "/a",
                PathItem::new(HttpMethod::Get, OperationBuilder::new().build()),
            ))
            .build();
        let b = OpenApiBuilder::new()
            .paths(PathsBuilder::new().path(
                "/b",
                PathItem::new(HttpMethod::Post, OperationBuilder::new().build()),
            ))
            .build();

        let doc = compose("Test API", "1.0.0", [a, b]);
        assert_eq!(doc.info.title, "Test API");
        assert!(doc.paths.paths.contains_key("/a"));
        assert!(doc.paths.paths.contains_key("/b"));
    }
}
