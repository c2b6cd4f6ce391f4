//! OpenSearch-backed product index

use async_trait::async_trait;
use opensearch::auth::Credentials;
use opensearch::cert::CertificateValidation;
use opensearch::http::Url;
use opensearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use opensearch::indices::{IndicesCreateParts, IndicesExistsParts};
use opensearch::{DeleteParts, IndexParts, OpenSearch, SearchParts};
use shared::events::ProductDocument;
use uuid::Uuid;

use super::{SearchError, SearchIndex, SearchQuery};

/// Product index backed by an OpenSearch/Elasticsearch cluster
#[derive(Debug, Clone)]
pub struct OpenSearchIndex {
    client: OpenSearch,
    index: String,
}

impl OpenSearchIndex {
    pub fn new(
        url: &str,
        username: Option<&str>,
        password: Option<&str>,
        index: &str,
    ) -> Result<Self, SearchError> {
        let url = Url::parse(url).map_err(|e| SearchError(e.to_string()))?;
        let cert_validation = if url.as_str().contains("https://localhost") {
            CertificateValidation::None
        } else {
            CertificateValidation::Default
        };
        let conn_pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .cert_validation(cert_validation);
        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.auth(Credentials::Basic(user.to_string(), pass.to_string()));
        }
        let transport = builder.build().map_err(|e| SearchError(e.to_string()))?;

        Ok(Self {
            client: OpenSearch::new(transport),
            index: index.to_string(),
        })
    }

    /// Create the product index if it does not exist yet
    pub async fn ensure_index(&self) -> Result<(), SearchError> {
        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[&self.index]))
            .send()
            .await?;
        if exists.status_code() == 200 {
            return Ok(());
        }

        let body = serde_json::json!({
            "mappings": {
                "properties": {
                    "id":          { "type": "keyword" },
                    "name":        { "type": "text" },
                    "sku":         { "type": "keyword" },
                    "description": { "type": "text" },
                    "category_id": { "type": "keyword" },
                    "tag_ids":     { "type": "keyword" },
                    "price":       { "type": "double" },
                    "availability":{ "type": "keyword" },
                    "rating":      { "type": "double" }
                }
            }
        });
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index))
            .body(body)
            .send()
            .await?;
        if !response.status_code().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError(format!("failed to create index: {body}")));
        }
        Ok(())
    }

    /// Build the bool/must clause list for a query
    fn build_query(query: &SearchQuery) -> serde_json::Value {
        let mut must = Vec::new();

        if let Some(q) = &query.q {
            must.push(serde_json::json!({
                "multi_match": { "query": q, "fields": ["name", "description"] }
            }));
        }
        if let Some(name) = &query.name {
            must.push(serde_json::json!({ "match": { "name": name } }));
        }
        if let Some(sku) = &query.sku {
            must.push(serde_json::json!({ "term": { "sku": sku } }));
        }
        if let Some(category_id) = &query.category_id {
            must.push(serde_json::json!({ "term": { "category_id": category_id } }));
        }
        if let Some(tag_id) = &query.tag_id {
            must.push(serde_json::json!({ "term": { "tag_ids": tag_id } }));
        }
        if let Some(availability) = &query.availability {
            must.push(serde_json::json!({ "term": { "availability": availability } }));
        }
        if query.min_price.is_some() || query.max_price.is_some() {
            let mut range = serde_json::Map::new();
            if let Some(min) = query.min_price {
                range.insert("gte".into(), serde_json::json!(min));
            }
            if let Some(max) = query.max_price {
                range.insert("lte".into(), serde_json::json!(max));
            }
            must.push(serde_json::json!({ "range": { "price": range } }));
        }
        if let Some(min_rating) = query.min_rating {
            must.push(serde_json::json!({ "range": { "rating": { "gte": min_rating } } }));
        }

        if must.is_empty() {
            must.push(serde_json::json!({ "match_all": {} }));
        }

        serde_json::json!({
            "query": { "bool": { "must": must } },
            "from": query.offset,
            "size": query.limit
        })
    }
}

#[async_trait]
impl SearchIndex for OpenSearchIndex {
    async fn upsert(&self, doc: &ProductDocument) -> Result<(), SearchError> {
        let id = doc.id.to_string();
        let response = self
            .client
            .index(IndexParts::IndexId(&self.index, &id))
            .body(doc)
            .send()
            .await?;
        if !response.status_code().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError(format!("upsert failed: {body}")));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), SearchError> {
        let id = id.to_string();
        let response = self
            .client
            .delete(DeleteParts::IndexId(&self.index, &id))
            .send()
            .await?;
        let status = response.status_code();
        // 404 means the document was never indexed; deletion is still done
        if !status.is_success() && status.as_u16() != 404 {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError(format!("delete failed: {body}")));
        }
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProductDocument>, SearchError> {
        let body = Self::build_query(query);
        let response = self
            .client
            .search(SearchParts::Index(&[&self.index]))
            .body(body)
            .send()
            .await?;
        if !response.status_code().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError(format!("search failed: {body}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SearchError(e.to_string()))?;
        let hits = json["hits"]["hits"].as_array().cloned().unwrap_or_default();
        let mut docs = Vec::with_capacity(hits.len());
        for hit in hits {
            let source = hit["_source"].clone();
            let doc: ProductDocument =
                serde_json::from_value(source).map_err(|e| SearchError(e.to_string()))?;
            docs.push(doc);
        }
        Ok(docs)
    }

    async fn health(&self) -> Result<(), SearchError> {
        let response = self.client.cat().health().send().await?;
        if response.status_code() != 200 {
            return Err(SearchError(format!(
                "health check failed with status {}",
                response.status_code()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_all() {
        let body = OpenSearchIndex::build_query(&SearchQuery::default());
        assert_eq!(
            body["query"]["bool"]["must"][0],
            serde_json::json!({ "match_all": {} })
        );
        assert_eq!(body["size"], 10);
        assert_eq!(body["from"], 0);
    }

    #[test]
    fn filters_become_must_clauses() {
        let query = SearchQuery {
            q: Some("desk".into()),
            min_price: Some(rust_decimal::Decimal::new(100, 0)),
            max_price: Some(rust_decimal::Decimal::new(500, 0)),
            ..Default::default()
        };
        let body = OpenSearchIndex::build_query(&query);
        let must = body["query"]["bool"]["must"].as_array().unwrap();
        assert_eq!(must.len(), 2);
        assert_eq!(must[0]["multi_match"]["query"], "desk");
        assert_eq!(must[1]["range"]["price"]["gte"], serde_json::json!(100.0));
        assert_eq!(must[1]["range"]["price"]["lte"], serde_json::json!(500.0));
    }
}
