use tabula::query::{self, select};
use tabula::{BoxRenderer, Catalog, ColumnDef, Condition, Operator, OrderBy, Renderer, Row};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== tabula demo ===\n");

    let mut catalog = Catalog::new();

    // Create and populate table
    {
        catalog.create_table(
            "employees",
            vec![
                ColumnDef::new("id"),
                ColumnDef::new("name"),
                ColumnDef::indexed("department"),
                ColumnDef::indexed("salary"),
            ],
        )?;
        println!("Created table 'employees'");

        let staff = [
            ("1", "Alice", "Engineering", "75000"),
            ("2", "Bob", "Engineering", "85000"),
            ("3", "Charlie", "Sales", "65000"),
            ("4", "Diana", "Marketing", "70000"),
            ("5", "Eve", "Engineering", "90000"),
            ("6", "Frank", "Sales", "60000"),
            ("7", "Grace", "Marketing", "72000"),
            ("8", "Henry", "Engineering", "80000"),
            ("9", "Ivy", "Sales", "68000"),
            ("10", "Jack", "Marketing", "74000"),
        ];
        for (id, name, department, salary) in staff {
            catalog.insert(
                "employees",
                vec![id.into(), name.into(), department.into(), salary.into()],
            )?;
        }
        println!("Inserted {} rows\n", staff.len());
    }

    let table = catalog.get_table("employees")?;
    let mut out = BoxRenderer::new(std::io::stdout());

    println!("Employees earning more than 80000, highest salary first:");
    let cond = Condition::Literal {
        column: "salary".into(),
        op: Operator::GreaterThan,
        value: "80000".into(),
    };
    let rows = select(table, Some(&cond), &[OrderBy::desc("salary")])?;
    out.render(table.columns(), &rows)?;

    // the last key decides first: by department, then by name inside it
    println!("\nEveryone by department, then by name:");
    let result = query::query(
        table,
        None,
        &[OrderBy::asc("name"), OrderBy::asc("department")],
    )?;
    let rows: Vec<&Row> = result.rows.iter().collect();
    out.render(&result.columns, &rows)?;

    println!("\nTables in catalog:");
    for name in catalog.list_tables() {
        println!("  - {name}");
    }
    println!("Heap usage: {} bytes", catalog.allocated_bytes());

    Ok(())
}
