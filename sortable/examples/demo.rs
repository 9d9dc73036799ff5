use std::fs::File;

use simplelog::{Config, LevelFilter, WriteLogger};
use sortable::{Sortable, SortableConfig};
use tabledom::{Document, Element, Event};

fn main() -> std::io::Result<()> {
    // Set up file logging
    let log_file = File::create("sortable.log")?;
    WriteLogger::init(LevelFilter::Trace, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let mut doc = Document::new(Element::new("body").child(orders()));
    let mut sortable = Sortable::new(SortableConfig::default());

    let tables = sortable.initialize_all(&mut doc, None);
    println!("initialized: {tables:?}");
    print_rows(&doc, "orders");

    for header in ["total", "total", "placed", "customer"] {
        for activation in sortable.handle_event(&mut doc, &Event::click(header)) {
            println!(
                "\n{header}: {:?} {} (toggled: {})",
                activation.column_type, activation.direction, activation.toggled
            );
        }
        print_rows(&doc, "orders");
    }

    Ok(())
}

fn orders() -> Element {
    let rows = [
        ["Contoso", "$1,200.00", "2024-03-01"],
        ["fabrikam", "$85.50", "2023-11-15"],
        ["Adventure Works", "n/a", "2024-01-20"],
        ["northwind", "$430.00", ""],
    ];

    Element::table()
        .id("orders")
        .attr("data-sortable", "")
        .child(
            Element::thead().child(
                Element::tr()
                    .child(Element::th("Customer").id("customer"))
                    .child(Element::th("Total").id("total"))
                    .child(
                        Element::th("Placed")
                            .id("placed")
                            .attr("data-default-direction", "descending"),
                    ),
            ),
        )
        .child(Element::tbody().children(rows.iter().map(|cells| {
            Element::tr().children(cells.iter().map(|c| Element::td(*c)))
        })))
}

fn print_rows(doc: &Document, table_id: &str) {
    let Some(tbody) = doc
        .get(table_id)
        .and_then(|t| t.child_elements().find(|e| e.is("tbody")))
    else {
        return;
    };
    for row in tbody.child_elements().filter(|e| e.is("tr")) {
        let cells: Vec<String> = row
            .child_elements()
            .filter(|c| c.is("td") || c.is("th"))
            .map(|c| c.text_content())
            .collect();
        println!("  {}", cells.join(" | "));
    }
}
