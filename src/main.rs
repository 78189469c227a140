use std::env;

use reltable::{KeyValue, Store, StoreConfig, Table, TableError, Value};

fn student() -> Result<Table, TableError> {
    let mut t = Table::define("student", "name id year gpa", "String Integer String Double", "id")?;
    t.insert(vec!["Fred".into(), 0.into(), "Freshman".into(), 3.5.into()])?;
    t.insert(vec!["Sally".into(), 1.into(), "Sophomore".into(), 2.8.into()])?;
    t.insert(vec!["Susan".into(), 2.into(), "Graduate".into(), 3.9.into()])?;
    t.insert(vec!["Robert".into(), 3.into(), "Senior".into(), 3.1.into()])?;
    Ok(t)
}

fn ta() -> Result<Table, TableError> {
    let mut t = Table::define("ta", "name id course", "String Integer String", "id")?;
    t.insert(vec!["Susan".into(), 2.into(), "Underwater Basket Weaving".into()])?;
    t.insert(vec!["Robert".into(), 3.into(), "Explosive Demolition 101".into()])?;
    Ok(t)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let student = student()?;
    let ta = ta()?;
    println!("{student}\n");
    println!("{ta}\n");

    let gpa = student.column_index_of("gpa").ok_or("no gpa column")?;
    println!("{}\n", student.select(|t| t[gpa] > Value::Double(3.0)));
    println!("{}\n", student.select_key(&KeyValue::from(Value::Integer(1))));
    println!("{}\n", student.project(&["name", "year"])?);
    println!("{}\n", student.join(&["id"], &["id"], &ta)?);
    println!("{}\n", student.h_join(&["name"], &["name"], &ta)?);

    let natural = student.natural_join(&ta)?;
    println!("{natural}\n");

    // Optional first argument: store directory.
    let mut config = StoreConfig::default();
    if let Some(dir) = env::args().nth(1) {
        config = config.with_dir(dir);
    }
    let store = Store::open(config)?;
    let path = store.save(&student)?;
    let reloaded = store.load(student.name())?;
    println!(
        "saved {} to {} and reloaded it: equal = {}, {} heap bytes",
        student.name(),
        path.display(),
        reloaded == student,
        reloaded.allocated_bytes()
    );
    Ok(())
}
