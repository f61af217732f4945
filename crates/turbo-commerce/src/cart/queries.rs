//! Cart GraphQL documents.

use serde::{Deserialize, Serialize};
use turbo_data::Operation;

use crate::cart::{Cart, LineAttribute};
use crate::error::{CommerceError, UserError};
use crate::ids::{CartId, CartLineId, VariantId};

macro_rules! cart_fields {
    () => {
        r#"
fragment CartFields on Cart {
  id
  checkoutUrl
  totalQuantity
  updatedAt
  cost {
    subtotalAmount { amount currencyCode }
    totalAmount { amount currencyCode }
    totalTaxAmount { amount currencyCode }
  }
  lines(first: 100) {
    edges {
      node {
        id
        quantity
        attributes { key value }
        merchandise {
          ... on ProductVariant {
            id
            title
            price { amount currencyCode }
            product {
              title
              handle
              featuredImage { url altText }
              images(first: 5) { nodes { url altText } }
            }
          }
        }
      }
    }
  }
}
"#
    };
}

macro_rules! cart_mutation {
    ($signature:literal, $field:literal, $args:literal) => {
        concat!(
            "mutation ",
            $signature,
            " {\n  ",
            $field,
            $args,
            " {\n    cart { ...CartFields }\n    userErrors { field message code }\n  }\n}\n",
            cart_fields!()
        )
    };
}

/// A line to add.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLineInput {
    pub merchandise_id: VariantId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<LineAttribute>,
}

/// A new quantity for an existing line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CartLineUpdateInput {
    pub id: CartLineId,
    pub quantity: u32,
}

/// The `{cart, userErrors}` shape every cart mutation returns.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartPayload {
    pub cart: Option<Cart>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

impl CartPayload {
    /// The updated cart, or the backend's validation errors.
    pub fn into_cart(self) -> Result<Cart, CommerceError> {
        if !self.user_errors.is_empty() {
            return Err(CommerceError::UserErrors(self.user_errors));
        }
        self.cart.ok_or(CommerceError::MissingCart)
    }
}

pub(crate) struct CartQuery;

#[derive(Debug, Serialize)]
pub(crate) struct CartQueryVars {
    pub id: CartId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartQueryData {
    pub cart: Option<Cart>,
}

impl Operation for CartQuery {
    type Variables = CartQueryVars;
    type ResponseData = CartQueryData;

    const QUERY: &'static str = concat!(
        "query CartQuery($id: ID!) {\n  cart(id: $id) { ...CartFields }\n}\n",
        cart_fields!()
    );
    const OPERATION_NAME: &'static str = "CartQuery";
}

pub(crate) struct CartCreate;

#[derive(Debug, Default, Serialize)]
pub(crate) struct CartInput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<CartLineInput>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CartCreateVars {
    pub input: CartInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartCreateData {
    pub cart_create: CartPayload,
}

impl Operation for CartCreate {
    type Variables = CartCreateVars;
    type ResponseData = CartCreateData;

    const QUERY: &'static str = cart_mutation!(
        "CartCreate($input: CartInput)",
        "cartCreate",
        "(input: $input)"
    );
    const OPERATION_NAME: &'static str = "CartCreate";

    fn is_mutation() -> bool {
        true
    }
}

pub(crate) struct CartLinesAdd;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLinesAddVars {
    pub cart_id: CartId,
    pub lines: Vec<CartLineInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLinesAddData {
    pub cart_lines_add: CartPayload,
}

impl Operation for CartLinesAdd {
    type Variables = CartLinesAddVars;
    type ResponseData = CartLinesAddData;

    const QUERY: &'static str = cart_mutation!(
        "CartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!)",
        "cartLinesAdd",
        "(cartId: $cartId, lines: $lines)"
    );
    const OPERATION_NAME: &'static str = "CartLinesAdd";

    fn is_mutation() -> bool {
        true
    }
}

pub(crate) struct CartLinesUpdate;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLinesUpdateVars {
    pub cart_id: CartId,
    pub lines: Vec<CartLineUpdateInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLinesUpdateData {
    pub cart_lines_update: CartPayload,
}

impl Operation for CartLinesUpdate {
    type Variables = CartLinesUpdateVars;
    type ResponseData = CartLinesUpdateData;

    const QUERY: &'static str = cart_mutation!(
        "CartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!)",
        "cartLinesUpdate",
        "(cartId: $cartId, lines: $lines)"
    );
    const OPERATION_NAME: &'static str = "CartLinesUpdate";

    fn is_mutation() -> bool {
        true
    }
}

pub(crate) struct CartLinesRemove;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLinesRemoveVars {
    pub cart_id: CartId,
    pub line_ids: Vec<CartLineId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLinesRemoveData {
    pub cart_lines_remove: CartPayload,
}

impl Operation for CartLinesRemove {
    type Variables = CartLinesRemoveVars;
    type ResponseData = CartLinesRemoveData;

    const QUERY: &'static str = cart_mutation!(
        "CartLinesRemove($cartId: ID!, $lineIds: [ID!]!)",
        "cartLinesRemove",
        "(cartId: $cartId, lineIds: $lineIds)"
    );
    const OPERATION_NAME: &'static str = "CartLinesRemove";

    fn is_mutation() -> bool {
        true
    }
}
