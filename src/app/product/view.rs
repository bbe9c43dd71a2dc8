//! 产品列表页面

use axum::response::Html;

const PRODUCT_LIST_PAGE: &str = include_str!("../../../public/products.html");

/// 返回挂载 `product-list` 组件的页面，数据由前端请求 `/api/products` 获取
pub async fn product_list_page() -> Html<&'static str> {
    Html(PRODUCT_LIST_PAGE)
}
