use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, RuntimeErr, Set};

use crate::{
    entities::movie,
    models::{Movie, MovieFields, MovieId},
};

pub type StoreResult<T> = Result<T, DbErr>;

/// How a single-record lookup is matched.
#[derive(Clone, Debug, PartialEq)]
pub enum MovieFilter {
    Id(MovieId),
    Title(String),
}

impl MovieFilter {
    /// Anything shaped like an identifier is looked up as one, even when a
    /// movie carries that exact text as its title.
    pub fn from_id_or_title(raw: &str) -> Self {
        match MovieId::parse(raw) {
            Some(id) => MovieFilter::Id(id),
            None => MovieFilter::Title(raw.to_string()),
        }
    }
}

/// Movie collection. Every method is one database round-trip.
///
/// A store built without a connection answers every call with a connection
/// error, so requests still get a response when startup could not connect.
#[derive(Clone)]
pub struct MovieStore {
    db: Option<DatabaseConnection>,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Some(db) }
    }

    pub fn disconnected() -> Self {
        Self { db: None }
    }

    fn db(&self) -> StoreResult<&DatabaseConnection> {
        self.db
            .as_ref()
            .ok_or_else(|| DbErr::Conn(RuntimeErr::Internal("database not connected".to_string())))
    }

    /// All movies in store order.
    pub async fn find_all(&self) -> StoreResult<Vec<Movie>> {
        let rows = movie::Entity::find().all(self.db()?).await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn find_one(&self, filter: MovieFilter) -> StoreResult<Option<Movie>> {
        let query = match filter {
            MovieFilter::Id(id) => movie::Entity::find_by_id(id.as_str().to_string()),
            MovieFilter::Title(title) => {
                movie::Entity::find().filter(movie::Column::Title.eq(title))
            }
        };
        Ok(query.one(self.db()?).await?.map(Movie::from))
    }

    pub async fn find_by_id(&self, id: &MovieId) -> StoreResult<Option<Movie>> {
        self.find_one(MovieFilter::Id(id.clone())).await
    }

    pub async fn insert(&self, fields: MovieFields) -> StoreResult<Movie> {
        let id = MovieId::generate();
        let model = movie::ActiveModel {
            id: Set(id.as_str().to_string()),
            title: Set(fields.title.clone()),
            poster: Set(fields.poster.clone()),
            released: Set(fields.released.clone()),
            metascore: Set(fields.metascore),
        };

        movie::Entity::insert(model).exec_without_returning(self.db()?).await?;
        Ok(fields.into_movie(id))
    }

    /// Replaces all four mutable fields. `None` when no movie has `id`.
    pub async fn update_by_id(
        &self,
        id: &MovieId,
        fields: MovieFields,
    ) -> StoreResult<Option<Movie>> {
        let changes = movie::ActiveModel {
            title: Set(fields.title.clone()),
            poster: Set(fields.poster.clone()),
            released: Set(fields.released.clone()),
            metascore: Set(fields.metascore),
            ..Default::default()
        };

        let result = movie::Entity::update_many()
            .set(changes)
            .filter(movie::Column::Id.eq(id.as_str()))
            .exec(self.db()?)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        Ok(Some(fields.into_movie(id.clone())))
    }

    /// Removing an absent movie is not an error.
    pub async fn delete_by_id(&self, id: &MovieId) -> StoreResult<()> {
        movie::Entity::delete_by_id(id.as_str().to_string()).exec(self.db()?).await?;
        Ok(())
    }
}
