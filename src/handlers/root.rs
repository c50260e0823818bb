use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the Motomarket API 👋
Version: {version}

Available endpoints:
  - POST   /users/signup              - Create an account
  - POST   /users/login               - Issue a bearer token
  - GET    /users/profile             - Read your profile          (bearer)
  - PUT    /users/profile             - Update your profile        (bearer, multipart)
  - DELETE /users/profile             - Delete your account        (bearer)
  - POST   /users/cart                - Add a bike to your cart    (bearer)
  - GET    /users/cart                - List your cart             (bearer)
  - DELETE /users/cart                - Remove a bike from cart    (bearer)
  - POST   /bikes                     - Create a listing           (bearer, multipart)
  - GET    /bikes                     - Browse listings (filters: location, model, owner, minPrice+maxPrice)
  - GET    /bikes/{{id}}                - Read one listing
  - PUT    /bikes/{{id}}                - Update a listing           (owner/admin)
  - DELETE /bikes/{{id}}                - Delete a listing           (owner/admin)
  - PATCH  /bikes/{{id}}/sold           - Mark sold                  (owner/admin)
  - PATCH  /bikes/{{id}}/available      - Relist                     (owner/admin)
  - POST   /bikes/{{id}}/book           - Book a bike                (bearer)
  - DELETE /bikes/{{id}}/book/{{buyerId}} - Remove a booking           (owner/admin)
  - GET    /bikes/{{id}}/pdf            - Listing summary PDF        (bearer)
  - GET    /admin/stats               - Dashboard numbers          (admin)
  - GET    /admin/users               - Customer accounts          (admin)
  - GET    /admin/bikes               - All listings               (admin)
  - GET    /admin/sales-report        - Monthly sales rollup       (admin)
  - GET    /health                    - Light health check
  - GET    /health?mode=full          - Full health check (includes the store)
  - GET    /metrics                   - Prometheus metrics

This API is the REST contract of a peer-to-peer used-motorcycle marketplace.
"#
    )
}
