use magpress_core::db::DbResult;
use magpress_core::{
    create_tables, Article, ArticleRow, Author, Magazine, NewArticle, Store,
};

fn file_store(dir: &tempfile::TempDir) -> Store {
    let store = Store::open(dir.path().join("catalog.db")).unwrap();
    assert!(create_tables(&store));
    store
}

fn delete(store: &Store, table: &str, id: i64) {
    store
        .with_connection(|conn| -> DbResult<usize> {
            Ok(conn.execute(&format!("DELETE FROM {table} WHERE id = ?1;"), [id])?)
        })
        .unwrap();
}

#[test]
fn end_to_end_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);

    let author = Author::construct(&store, None, Some("Jane Doe")).unwrap();
    assert_eq!(author.id(), 1);
    let magazine =
        Magazine::construct(&store, None, Some("Tech Weekly"), Some("Technology")).unwrap();
    assert_eq!(magazine.id(), 1);

    let article = Article::construct(
        &store,
        None,
        Some("A Great Title Here"),
        Some("Some content body"),
        Some(1),
        Some(1),
    )
    .unwrap();
    assert_eq!(article.id(), 1);
    assert_eq!(article.title(), "A Great Title Here");
    assert_eq!(article.content(), "Some content body");

    let loaded = Article::construct(&store, Some(1), None, None, None, None).unwrap();
    assert_eq!(loaded.author().unwrap().name(), Some("Jane Doe"));

    let rows = Author::construct(&store, Some(1), None)
        .unwrap()
        .articles()
        .unwrap();
    assert_eq!(
        rows,
        vec![ArticleRow {
            title: "A Great Title Here".to_string(),
            content: "Some content body".to_string(),
            author_id: 1,
            magazine_id: 1,
        }]
    );

    let contributors = Magazine::construct(&store, Some(1), None, None)
        .unwrap()
        .contributors()
        .unwrap();
    let jane = Author::create_or_reuse(&store, "Jane Doe").unwrap();
    assert_eq!(contributors, vec![jane]);
}

#[test]
fn deleting_author_cascades_to_articles() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    let jane = Author::create_or_reuse(&store, "Jane Doe").unwrap();
    let john = Author::create_or_reuse(&store, "John Roe").unwrap();
    let tech = Magazine::create_or_reuse(&store, "Tech Weekly", "Technology").unwrap();
    let janes = write(&store, "Jane on chips", jane.id(), tech.id());
    write(&store, "John on chips", john.id(), tech.id());

    delete(&store, "authors", jane.id());

    assert!(Article::get(&store, janes).is_err());
    assert_eq!(tech.articles().unwrap().len(), 1);
    assert_eq!(tech.contributors().unwrap(), vec![john]);
}

#[test]
fn deleting_magazine_cascades_to_articles() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    let jane = Author::create_or_reuse(&store, "Jane Doe").unwrap();
    let tech = Magazine::create_or_reuse(&store, "Tech Weekly", "Technology").unwrap();
    let food = Magazine::create_or_reuse(&store, "Food Monthly", "Cooking").unwrap();
    write(&store, "Chips and chips", jane.id(), tech.id());
    write(&store, "Soup of the day", jane.id(), food.id());

    delete(&store, "magazines", tech.id());

    let remaining = jane.articles().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].magazine_id, food.id());
    assert_eq!(jane.magazines().unwrap(), vec![food]);
}

#[test]
fn file_store_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reopen.db");
    {
        let store = Store::open(&path).unwrap();
        Author::create_or_reuse(&store, "Jane Doe").unwrap();
    }

    let reopened = Store::open(&path).unwrap();
    let author = Author::get(&reopened, 1).unwrap();
    assert_eq!(author.name(), Some("Jane Doe"));
}

fn write(store: &Store, title: &str, author_id: i64, magazine_id: i64) -> i64 {
    Article::create(
        store,
        &NewArticle {
            title,
            content: "body text",
            author_id,
            magazine_id,
        },
    )
    .unwrap()
    .id()
}
