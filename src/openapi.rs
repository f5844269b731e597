use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::sale_line::ContainerType;
use crate::errors::ErrorResponse;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tienda API",
        version = "0.1.0",
        description = "Point-of-sale and lot-level inventory backend for a single small retail store. \
            Purchases mint dated lots, sales deplete them First-Expired-First-Out with pre-flight \
            stock verification, and shrinkage is recorded per lot."
    ),
    paths(
        handlers::lots::list_lots,
        handlers::lots::get_lot,
        handlers::lots::create_lot,
        handlers::lots::update_lot,
        handlers::lots::delete_lot,
        handlers::lots::next_depletable_lot,
        handlers::purchases::create_purchase,
        handlers::purchases::list_purchases,
        handlers::purchases::get_purchase,
        handlers::sales::create_sale,
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::consumption::record_consumption,
        handlers::consumption::list_consumptions,
        handlers::inventory::grouped_inventory,
        handlers::inventory::low_stock,
        handlers::inventory::lots_for_product,
        handlers::products::list_products,
        handlers::products::get_product,
    ),
    components(schemas(
        ErrorResponse,
        ContainerType,
        crate::entities::product::Model,
        crate::entities::lote::Model,
        crate::entities::purchase::Model,
        crate::entities::purchase_line::Model,
        crate::entities::sale::Model,
        crate::entities::sale_line::Model,
        crate::entities::consumo_interno::Model,
        crate::services::inventory::InventoryGroup,
        handlers::lots::CreateLotRequest,
        handlers::lots::UpdateLotRequest,
        handlers::purchases::CreatePurchaseRequest,
        handlers::purchases::PurchaseLineRequest,
        handlers::purchases::PurchaseWithLines,
        handlers::sales::CreateSaleRequest,
        handlers::sales::SaleLineRequest,
        handlers::sales::SaleWithLines,
        handlers::consumption::RecordConsumptionRequest,
    )),
    tags(
        (name = "lots", description = "Lot store: batches of stock with expiration dates"),
        (name = "purchases", description = "Stock-in: purchases minting new lots"),
        (name = "sales", description = "Stock-out: FEFO lot depletion"),
        (name = "consumptions", description = "Internal use and shrinkage"),
        (name = "inventory", description = "Grouped inventory and low-stock views"),
        (name = "products", description = "Read-only product catalog"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
