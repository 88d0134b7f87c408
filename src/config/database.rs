use crate::config::app_config::AppConfig;
use crate::constants::{LEADERBOARD_COLL_NAME, USERS_COLL_NAME};
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};

pub async fn connect_to_mongodb(config: &AppConfig) -> mongodb::error::Result<Database> {
    let client = Client::with_uri_str(&config.mongodb_uri).await?;
    let database = client.database(&config.db_name);

    database.run_command(doc! { "ping": 1 }).await?;
    log::info!("Connected to MongoDB database '{}'", config.db_name);

    ensure_indexes(&database).await?;

    Ok(database)
}

async fn ensure_indexes(database: &Database) -> mongodb::error::Result<()> {
    let unique_username = IndexModel::builder()
        .keys(doc! { "username": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    database
        .collection::<Document>(USERS_COLL_NAME)
        .create_index(unique_username)
        .await?;

    let ranking = IndexModel::builder()
        .keys(doc! { "game_type": 1, "score": -1 })
        .build();
    // One entry per owner and game type, for registered users and guests alike.
    let registered_key = IndexModel::builder()
        .keys(doc! { "user_id": 1, "game_type": 1 })
        .options(
            IndexOptions::builder()
                .unique(true)
                .partial_filter_expression(doc! { "is_guest": false })
                .build(),
        )
        .build();
    let guest_key = IndexModel::builder()
        .keys(doc! { "guest_id": 1, "game_type": 1 })
        .options(
            IndexOptions::builder()
                .unique(true)
                .partial_filter_expression(doc! { "is_guest": true })
                .build(),
        )
        .build();
    database
        .collection::<Document>(LEADERBOARD_COLL_NAME)
        .create_indexes([ranking, registered_key, guest_key])
        .await?;

    Ok(())
}
