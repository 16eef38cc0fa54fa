use quotes::{extract_from_message, Reply};

fn main() {
    let eml = include_str!("./reply.eml");
    let reply = extract_from_message(eml).unwrap();

    println!("================================");
    println!("RAW MESSAGE");
    println!("================================");
    println!();
    println!("{eml}");

    println!("================================");
    println!("EXTRACTED REPLY");
    println!("================================");
    println!();

    match reply {
        Some(Reply::Html(reply)) => println!("{}", reply.body),
        Some(Reply::Plain(reply)) => println!("{}", reply.body),
        None => println!("no text body found"),
    }
}
