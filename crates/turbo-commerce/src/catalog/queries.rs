//! Catalog GraphQL documents.

use serde::{Deserialize, Serialize};
use turbo_data::Operation;

use crate::catalog::{Product, ProductRecord};
use crate::connection::Connection;
use crate::search::PageInfo;

macro_rules! product_fields {
    () => {
        r#"
fragment ProductFields on Product {
  id
  title
  handle
  vendor
  productType
  tags
  availableForSale
  images(first: 5) { nodes { url altText } }
  variants(first: 50) {
    nodes { id title availableForSale sku price { amount currencyCode } }
  }
}
"#
    };
}

pub(crate) struct ProductByHandle;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductByHandleVars {
    pub handle: String,
    pub namespace: String,
    pub components_key: String,
    pub premier_key: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductByHandleData {
    pub product: Option<ProductRecord>,
}

impl Operation for ProductByHandle {
    type Variables = ProductByHandleVars;
    type ResponseData = ProductByHandleData;

    const QUERY: &'static str = concat!(
        r#"
query ProductByHandle($handle: String!, $namespace: String!, $componentsKey: String!, $premierKey: String!) {
  product(handle: $handle) {
    ...ProductFields
    bundleComponents: metafield(namespace: $namespace, key: $componentsKey) { value }
    includesPremier: metafield(namespace: $namespace, key: $premierKey) { value }
  }
}
"#,
        product_fields!()
    );
    const OPERATION_NAME: &'static str = "ProductByHandle";
}

pub(crate) struct SearchProducts;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchProductsVars {
    pub query: String,
    pub first: u32,
    pub after: Option<String>,
    pub sort_key: String,
    pub reverse: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductPage {
    #[serde(flatten)]
    pub items: Connection<Product>,
    #[serde(default)]
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchProductsData {
    pub products: ProductPage,
}

impl Operation for SearchProducts {
    type Variables = SearchProductsVars;
    type ResponseData = SearchProductsData;

    const QUERY: &'static str = concat!(
        r#"
query SearchProducts($query: String!, $first: Int!, $after: String, $sortKey: ProductSortKeys, $reverse: Boolean) {
  products(query: $query, first: $first, after: $after, sortKey: $sortKey, reverse: $reverse) {
    pageInfo { hasNextPage endCursor }
    edges { node { ...ProductFields } }
  }
}
"#,
        product_fields!()
    );
    const OPERATION_NAME: &'static str = "SearchProducts";
}
