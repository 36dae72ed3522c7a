use log::{info, warn};
use tokio::time::{sleep, Duration};

use crate::{
    api::{
        account::{AccountClient, Registration},
        categories::{category_of, CategoryClient},
        products::{Product, ProductClient},
    },
    core::{
        authenticator::{authentication_error::AuthenticationError, Authenticator},
        common::{http_client_factory::AuthenticatedHttpClientFactory, transport::ApiError},
        configuration::Configuration,
        session::{
            claims,
            store::{FileSystemStore, SessionData, SessionStore},
            Action, Permissions,
        },
    },
};

/// How long the one-time welcome message stays on screen.
const WELCOME_DISPLAY: Duration = Duration::from_secs(2);

fn create_store(conf: &Configuration) -> FileSystemStore {
    FileSystemStore::new(conf.core.data_directory.as_ref().unwrap().to_owned())
}

/// ### Open the session for a protected operation
/// Reads the session store; without a token the operation is refused before
/// anything goes on the wire. With a token, the one-time welcome flow runs:
/// on a fresh session the display name is decoded from the token, greeted for
/// a fixed two seconds and the flag is persisted so no later command greets
/// again.
async fn open_session(
    store: &dyn SessionStore,
) -> Result<SessionData, Box<dyn std::error::Error + Send + Sync>> {
    let session = match store.read().await? {
        Some(s) => s,
        None => {
            return Err(Box::new(AuthenticationError::new(
                "not logged in, please login first".to_string(),
            )))
        }
    };

    if !session.welcome_shown {
        match claims::decode(&session.token) {
            Ok(c) => {
                if let Some(name) = c.display_name() {
                    println!("Welcome, {}!", name);
                    sleep(WELCOME_DISPLAY).await;
                }
            }
            Err(e) => warn!("cannot decode token claims: {e}"),
        }

        store.mark_welcome_shown().await?;
    }

    Ok(session)
}

/// Refuses the action locally when the role does not expose it. No network
/// call is made on refusal.
fn authorize(session: &SessionData, action: Action) -> Result<(), ApiError> {
    let permissions = Permissions::from_role(session.is_admin);

    if !permissions.allows(action) {
        return Err(ApiError::Unauthorized(
            "Not authorized to perform this operation".to_string(),
        ));
    }

    Ok(())
}

fn create_factory(conf: &Configuration, session: &SessionData) -> AuthenticatedHttpClientFactory {
    AuthenticatedHttpClientFactory::new(conf.api_url(), session.token.clone())
}

/// ### Login
/// Exchanges the credentials for a session. Omitted credentials fall back to
/// the remembered ones, the way the login form pre-fills itself. On success
/// the action menu is rendered, which is where the welcome flow fires for the
/// fresh session.
pub async fn login(
    conf: &Configuration,
    username: Option<String>,
    password: Option<String>,
    remember: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = create_store(conf);

    let (username, password, remember) = match (&username, &password) {
        (Some(u), Some(p)) => (u.to_owned(), p.to_owned(), remember),
        _ => match store.read_remembered().await? {
            Some(c) => {
                info!("using remembered credentials");
                (c.username, c.password, true)
            }
            None => (
                username.unwrap_or_default(),
                password.unwrap_or_default(),
                remember,
            ),
        },
    };

    let authenticator = Authenticator::new(conf.api_url(), Box::new(store));

    let session = authenticator.login(&username, &password, remember).await?;

    info!(
        "logged in as {}",
        session.username.as_deref().unwrap_or("unknown")
    );

    menu(conf).await
}

pub async fn logout(
    conf: &Configuration,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = create_store(conf);

    let authenticator = Authenticator::new(conf.api_url(), Box::new(store));

    authenticator.logout().await
}

/// Renders the action set the current role exposes.
pub async fn menu(conf: &Configuration) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = create_store(conf);
    let session = open_session(&store).await?;

    let permissions = Permissions::from_role(session.is_admin);

    println!("Available actions:");
    for action in permissions.visible_actions() {
        println!("  {}", action);
    }

    Ok(())
}

/// ### Session diagnostic
/// Prints the decoded identity, the role flag and the welcome-flag state of
/// the current session. The raw token is only shown on request.
pub async fn session_diagnostic(
    conf: &Configuration,
    show_token: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = create_store(conf);
    let session = open_session(&store).await?;

    let claims = claims::decode(&session.token)?;

    println!(
        "USER: {}",
        session.username.as_deref().unwrap_or("unknown")
    );
    if let Some(name) = claims.display_name() {
        println!("NAME: {}", name);
    }
    println!("ADMIN: {}", session.is_admin);
    println!("WELCOME_SHOWN: {}", session.welcome_shown);

    if show_token {
        println!("TOKEN: {}", session.token);
    }

    Ok(())
}

pub async fn register_account(
    conf: &Configuration,
    registration: Registration,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let client = AccountClient::new(conf.api_url());

    client.register(&registration).await?;

    info!("successfully registered account");
    println!("Account registered, you can now login");

    Ok(())
}

/// ### Search products
/// By name the result is a list, each hit joined to the category containing
/// it; by SKU the result is a single product. A miss is an ordinary outcome,
/// reported as "Product not found" with an empty result.
pub async fn search_product(
    conf: &Configuration,
    name: Option<String>,
    sku: Option<String>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = create_store(conf);
    let session = open_session(&store).await?;

    let factory = create_factory(conf, &session);
    let products = ProductClient::new(&factory);

    match (name, sku) {
        (Some(name), _) => {
            let hits = match products.search_by_name(&name).await {
                Ok(h) => h,
                Err(ApiError::NotFound(reason)) => {
                    println!("{}", reason);
                    return Ok(());
                }
                Err(e) => return Err(Box::new(e)),
            };

            // the category list is only used to label the hits, a failure
            // there does not fail the search
            let categories = match CategoryClient::new(&factory).list().await {
                Ok(c) => c,
                Err(e) => {
                    warn!("cannot fetch categories: {e}");
                    vec![]
                }
            };

            for product in &hits {
                let category = product
                    .id
                    .and_then(|id| category_of(&categories, id))
                    .map(|c| c.name.as_str())
                    .unwrap_or("-");

                println!(
                    "{}  {}  {:.2}  {}",
                    product.sku, product.name, product.price, category
                );
            }

            info!("search by name returned {} product(s)", hits.len());
        }
        (None, Some(sku)) => {
            let product = match products.get_by_sku(&sku).await {
                Ok(p) => p,
                Err(ApiError::NotFound(reason)) => {
                    println!("{}", reason);
                    return Ok(());
                }
                Err(e) => return Err(Box::new(e)),
            };

            println!(
                "{}  {}  {:.2}  {}",
                product.sku, product.name, product.price, product.description
            );
        }
        (None, None) => {
            return Err(Box::new(ApiError::Validation(
                "Provide --name or --sku to search.".to_string(),
            )))
        }
    }

    Ok(())
}

pub async fn create_product(
    conf: &Configuration,
    name: String,
    sku: String,
    description: String,
    image_url: String,
    price: f64,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = create_store(conf);
    let session = open_session(&store).await?;

    authorize(&session, Action::CreateProduct)?;

    let product = Product {
        id: None,
        name,
        sku,
        description,
        image_url,
        price,
    };

    let factory = create_factory(conf, &session);

    ProductClient::new(&factory).create(&product).await?;

    info!("registered product {}", product.sku);
    println!("Product {} registered", product.sku);

    Ok(())
}

/// Whole-record update: the current record is fetched first and the given
/// fields replace their counterparts before the PUT.
pub async fn update_product(
    conf: &Configuration,
    sku: String,
    name: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    price: Option<f64>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = create_store(conf);
    let session = open_session(&store).await?;

    authorize(&session, Action::UpdateProduct)?;

    let factory = create_factory(conf, &session);
    let products = ProductClient::new(&factory);

    let mut product = products.get_by_sku(&sku).await?;

    if let Some(name) = name {
        product.name = name;
    }
    if let Some(description) = description {
        product.description = description;
    }
    if let Some(image_url) = image_url {
        product.image_url = image_url;
    }
    if let Some(price) = price {
        product.price = price;
    }

    products.update(&product).await?;

    info!("updated product {}", product.sku);
    println!("Product {} updated", product.sku);

    Ok(())
}

pub async fn delete_product(
    conf: &Configuration,
    sku: String,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = create_store(conf);
    let session = open_session(&store).await?;

    authorize(&session, Action::DeleteProduct)?;

    let factory = create_factory(conf, &session);

    ProductClient::new(&factory).delete(&sku).await?;

    info!("deleted product {}", sku);
    println!("Product {} deleted", sku);

    Ok(())
}

pub async fn list_categories(
    conf: &Configuration,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = create_store(conf);
    let session = open_session(&store).await?;

    let factory = create_factory(conf, &session);

    let categories = CategoryClient::new(&factory).list().await?;

    for category in &categories {
        println!(
            "{}  {}  ({} product(s))",
            category.id,
            category.name,
            category.products.len()
        );
    }

    info!("listed {} categories", categories.len());

    Ok(())
}

pub async fn create_category(
    conf: &Configuration,
    name: String,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = create_store(conf);
    let session = open_session(&store).await?;

    authorize(&session, Action::CreateCategory)?;

    let factory = create_factory(conf, &session);

    CategoryClient::new(&factory).create(&name).await?;

    info!("created category {}", name);
    println!("Category {} created", name);

    Ok(())
}

/// ### Assign a product to a category
/// The product is addressed by SKU on the command line; its id is resolved
/// through the product endpoint before the association is posted.
pub async fn assign_product(
    conf: &Configuration,
    category_id: i64,
    sku: String,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = create_store(conf);
    let session = open_session(&store).await?;

    authorize(&session, Action::AssignProductToCategory)?;

    let factory = create_factory(conf, &session);

    let product = ProductClient::new(&factory).get_by_sku(&sku).await?;

    let product_id = match product.id {
        Some(id) => id,
        None => {
            return Err(Box::new(ApiError::NotFound(
                "Product not found".to_string(),
            )))
        }
    };

    CategoryClient::new(&factory)
        .assign_product(category_id, product_id)
        .await?;

    info!("assigned product {} to category {}", sku, category_id);
    println!("Product {} assigned to category {}", sku, category_id);

    Ok(())
}
