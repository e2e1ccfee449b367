use crate::errors::Result;
use serde::{de::DeserializeOwned, Serialize};

pub mod json_file;

/// The four record sets persisted by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Restaurants,
    Menus,
    Orders,
    Reservations,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Restaurants,
        Collection::Menus,
        Collection::Orders,
        Collection::Reservations,
    ];

    /// Name of the JSON document backing the collection
    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Restaurants => "restaurants.json",
            Collection::Menus => "menus.json",
            Collection::Orders => "orders.json",
            Collection::Reservations => "reservations.json",
        }
    }
}

/// Trait hiding the storage implementation
///
/// Stores only know about whole documents: every mutation reads the full
/// collection and writes it back. `MemoryDb` backs the unit tests, `JsonFileDb`
/// the server.
pub trait Database {
    /// Raw contents of the collection, `None` if it was never written
    fn read(&self, collection: Collection) -> Result<Option<String>>;

    /// Replace the whole collection with `contents`
    fn write(&mut self, collection: Collection, contents: &str) -> Result<()>;

    fn exists(&self, collection: Collection) -> bool {
        matches!(self.read(collection), Ok(Some(_)))
    }
}

/// Read and decode a collection.
///
/// A missing or unreadable document yields the empty collection. Corruption is
/// logged and otherwise ignored.
pub fn load<T>(db: &dyn Database, collection: Collection) -> T
where
    T: DeserializeOwned + Default,
{
    let contents = match db.read(collection) {
        Ok(Some(contents)) => contents,
        Ok(None) => return T::default(),
        Err(err) => {
            tracing::warn!(file = collection.file_name(), %err, "failed to read collection");
            return T::default();
        }
    };

    serde_json::from_str(&contents).unwrap_or_else(|err| {
        tracing::warn!(file = collection.file_name(), %err, "failed to parse collection");
        T::default()
    })
}

/// Encode and overwrite a collection
pub fn save<T>(db: &mut dyn Database, collection: Collection, records: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let contents = serde_json::to_string_pretty(records)?;
    db.write(collection, &contents)
}

pub mod mock {
    use super::*;
    use std::collections::HashMap;

    /// In-memory store, documents kept as the same JSON text the file store writes
    #[derive(Default)]
    pub struct MemoryDb(HashMap<Collection, String>);

    impl MemoryDb {
        pub fn new() -> Self {
            Self::default()
        }

        /// A store populated with the sample restaurants and menus
        pub fn seeded() -> Result<Self> {
            let mut db = Self::new();
            crate::seed::seed(&mut db)?;
            Ok(db)
        }
    }

    impl Database for MemoryDb {
        fn read(&self, collection: Collection) -> Result<Option<String>> {
            Ok(self.0.get(&collection).cloned())
        }

        fn write(&mut self, collection: Collection, contents: &str) -> Result<()> {
            self.0.insert(collection, contents.to_string());
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::api::MenuItem;
        use std::collections::BTreeMap;

        fn item(id: &str, name: &str) -> MenuItem {
            MenuItem {
                id: id.to_string(),
                name: name.to_string(),
                price: 10.0,
                category: "Mains".to_string(),
                description: String::new(),
                image: String::new(),
            }
        }

        #[test]
        fn test_mock_db() {
            let mut db = MemoryDb::new();
            assert!(!db.exists(Collection::Menus));

            let loaded: BTreeMap<String, Vec<MenuItem>> = load(&db, Collection::Menus);
            assert!(loaded.is_empty());

            let mut menus = BTreeMap::new();
            menus.insert("1".to_string(), vec![item("1", "Pizza"), item("2", "Pasta")]);
            menus.insert("2".to_string(), vec![item("3", "Burger")]);
            save(&mut db, Collection::Menus, &menus).unwrap();

            assert!(db.exists(Collection::Menus));
            let loaded: BTreeMap<String, Vec<MenuItem>> = load(&db, Collection::Menus);
            assert_eq!(loaded, menus);
            assert_eq!(loaded["1"][1].name, "Pasta");
        }

        #[test]
        fn test_corrupt_collection_loads_empty() {
            let mut db = MemoryDb::new();
            db.write(Collection::Orders, "{ not json").unwrap();

            let orders: Vec<crate::api::Order> = load(&db, Collection::Orders);
            assert!(orders.is_empty());
        }
    }
}
