// One module per resource. Each handler performs a single repository call;
// validation and authentication happen in the extractors it declares.
//
//   auth       POST /auth/signup, POST /auth/login, GET /auth/me
//   products   /products[/:id], GET /products/:id/sales
//   customers  /customers[/:id], GET /customers/:id/sales
//   sales      /sales[/:id]
//   posts      /posts[/:id]
//   health     GET /health, GET /ready

pub mod auth;
pub mod customers;
pub mod health;
pub mod posts;
pub mod products;
pub mod sales;
