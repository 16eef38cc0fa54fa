use concat_with::concat_line;
use quotes::{extract_from_plain, ReplyExtractor};

#[test_log::test]
fn reply_above_on_date_splitter() {
    let body = concat_line!(
        "Test reply",
        "",
        "On 11-Apr-2011, at 6:54 PM, Roman <romant@example.com> wrote:",
        "",
        ">",
        "> Test",
        ">",
        "> Roman",
    );

    let reply = extract_from_plain(body);

    assert!(reply.did_find_quote);
    assert_eq!(reply.body, "Test reply");
}

#[test_log::test]
fn reply_with_glued_splitter() {
    let body = concat_line!(
        "reply On Wed, Apr 4, 2012 at 3:59 PM, bob@example.com wrote:",
        "> Hi",
    );

    let reply = extract_from_plain(body);

    assert!(reply.did_find_quote);
    assert_eq!(reply.body, "reply");
}

#[test_log::test]
fn reply_above_original_message_banner() {
    let body = concat_line!(
        "Reply",
        "",
        "-----Original Message-----",
        "From: bob@example.com",
        "Sent: Monday, April 4, 2011 3:59 PM",
        "",
        "Hello",
    );

    let reply = extract_from_plain(body);

    assert!(reply.did_find_quote);
    assert_eq!(reply.body, "Reply");
}

#[test_log::test]
fn extraction_is_idempotent() {
    let body = concat_line!(
        "Reply",
        "",
        "On Mon, Apr 4, 2011 at 3:59 PM, bob@example.com wrote:",
        "> Hello",
        "> world",
    );

    let once = extract_from_plain(body);
    let twice = extract_from_plain(&once.body);

    assert_eq!(once.body, "Reply");
    assert_eq!(twice.body, once.body);
    assert!(!twice.did_find_quote);
}

#[test_log::test]
fn body_without_quotation_is_unchanged() {
    let body = concat_line!("Hello,", "", "See you tomorrow.", "", "Bob", "");

    let reply = extract_from_plain(body);

    assert!(!reply.did_find_quote);
    assert_eq!(reply.body, body);
}

#[test_log::test]
fn forwarded_message_is_unchanged() {
    let body = concat_line!(
        "FYI",
        "",
        "---------- Forwarded message ----------",
        "From: Bob <bob@example.com>",
        "Date: Mon, Apr 4, 2011 at 3:59 PM",
        "Subject: Hello",
        "",
        "> Hello",
        "> world",
    );

    let reply = extract_from_plain(body);

    assert!(!reply.did_find_quote);
    assert_eq!(reply.body, body);
}

#[test_log::test]
fn inline_reply_is_unchanged() {
    let body = concat_line!(
        "On Mon, Apr 4, 2011 at 3:59 PM, bob@example.com wrote:",
        "> First question?",
        "First answer.",
        "> Second question?",
        "Second answer.",
    );

    let reply = extract_from_plain(body);

    assert!(!reply.did_find_quote);
    assert_eq!(reply.body, body);
}

#[test_log::test]
fn links_survive_extraction() {
    let body = concat_line!(
        "See <http://example.com/path>",
        "",
        "On Mon, Apr 4, 2011 at 3:59 PM, bob@example.com wrote:",
        "> Hello",
    );

    let reply = extract_from_plain(body);

    assert!(reply.did_find_quote);
    assert_eq!(reply.body, "See <http://example.com/path>");
}

#[test_log::test]
fn lonely_quotation_markers_are_kept() {
    let body = concat_line!("Reply", "> not a quote", "> really", "Bye");

    let reply = extract_from_plain(body);

    assert!(!reply.did_find_quote);
    assert_eq!(reply.body, body);
}

#[test_log::test]
fn quotation_markers_without_splitter() {
    let body = concat_line!("Reply", "", "> Hello", "> there", "> world");

    let reply = extract_from_plain(body);

    assert!(reply.did_find_quote);
    assert_eq!(reply.body, "Reply");
}

#[test_log::test]
fn configured_lines_count() {
    let body = concat_line!(
        "Reply",
        "Bye",
        "",
        "On Mon, Apr 4, 2011 at 3:59 PM, bob@example.com wrote:",
        "> Hello",
    );

    let extractor = ReplyExtractor::new().with_max_lines_count(2);
    let reply = extractor.extract_from_plain(body);

    assert!(!reply.did_find_quote);
    assert_eq!(reply.body, body);
}
