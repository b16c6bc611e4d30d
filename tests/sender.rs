use mailbox_header::{
    decode, Address, Header, HeaderError, HeaderFormat, MimeEncoder, ResentSender, Sender,
};

#[test]
fn round_trips_ascii_lines() {
    for line in [
        "Sender: Bob Smith <bob@example.com>",
        "Sender: <bob@example.com>",
        "Sender: secretary.of.state@gov.example",
    ] {
        let sender = Sender::parse(line).unwrap();
        let again = Sender::parse(&sender.serialize()).unwrap();
        assert_eq!(sender, again, "{}", line);
    }

    let sender = Sender::parse("Sender: Bob Smith <bob@example.com>").unwrap();
    assert_eq!("Sender: Bob Smith <bob@example.com>", sender.serialize());
}

#[test]
fn round_trips_non_ascii_names() {
    let raw = "Sender: =?UTF-8?Q?Ren=C3=A9_Fran=C3=A7ois?= <rene@example.fr>";
    let sender = Sender::parse(raw).unwrap();
    assert_eq!("UTF-8", sender.encoding());
    assert_eq!(Some("René François"), sender.address().unwrap().name());

    let wire = sender.serialize();
    assert_ne!(raw, wire);

    let again = Sender::parse(&wire).unwrap();
    assert_eq!(sender.address(), again.address());
    assert_eq!("UTF-8", again.encoding());
}

#[test]
fn base64_encoded_name() {
    let sender = Sender::parse("Sender: =?UTF-8?B?SsO8cmdlbg==?= <j@example.com>").unwrap();
    assert_eq!(Some("Jürgen"), sender.address().unwrap().name());
    assert_eq!("Sender: =?UTF-8?Q?J=C3=BCrgen?= <j@example.com>", sender.serialize());
}

#[test]
fn malformed_encoded_word_is_kept() {
    let sender = Sender::parse("Sender: =?UTF-8?B?!!!?= <bob@example.com>").unwrap();
    let address = sender.address().unwrap();
    assert_eq!("bob@example.com", address.email());
    assert_eq!(Some("=?UTF-8?B?!!!?="), address.name());
}

#[test]
fn wrong_field_name_is_rejected() {
    for line in [
        "From: Bob <bob@example.com>",
        "Reply-To: Bob <bob@example.com>",
        "Senders: Bob <bob@example.com>",
    ] {
        assert!(
            matches!(Sender::parse(line), Err(HeaderError::Parse(_))),
            "{}",
            line
        );
    }

    assert!(ResentSender::parse("Resent-Sender: Bob <bob@example.com>").is_ok());
}

#[test]
fn folded_line_keeps_its_address() {
    let sender = Sender::parse("Sender: Bob\r\n Smith <bob@example.com>").unwrap();
    let address = sender.address().unwrap();
    assert_eq!("bob@example.com", address.email());
    assert_eq!(Some("Bob Smith"), address.name());
    assert_eq!("UTF-8", sender.encoding());
}

#[test]
fn value_without_brackets_has_no_address() {
    let sender = Sender::parse("Sender: just text").unwrap();
    assert!(sender.address().is_none());
    assert_eq!("Sender: ", sender.serialize());
}

#[test]
fn format_modes() {
    let mut sender = Sender::new();
    sender.set_address("anna@example.se", Some("Åsa Öberg")).unwrap();

    assert_eq!("Åsa Öberg <anna@example.se>", sender.field_value(HeaderFormat::Raw));
    assert_eq!("Åsa Öberg <anna@example.se>", sender.field_value(HeaderFormat::Encoded));

    sender.set_encoding("UTF-8");
    assert_eq!("Åsa Öberg <anna@example.se>", sender.field_value(HeaderFormat::Raw));
    assert_eq!(
        "=?UTF-8?Q?=C3=85sa=20=C3=96berg?= <anna@example.se>",
        sender.field_value(HeaderFormat::Encoded)
    );

    sender.set_encoding("ISO-8859-1");
    assert_eq!(
        "Sender: =?ISO-8859-1?Q?=C5sa=20=D6berg?= <anna@example.se>",
        sender.serialize()
    );
}

#[test]
fn long_names_fold_and_decode_back() {
    let name = "Παναγιώτης Κωνσταντινόπουλος-Παπαδημητρίου";
    let sender = Sender::new()
        .with_address("p@example.gr", Some(name))
        .unwrap()
        .with_encoding("UTF-8");

    let wire = sender.field_value(HeaderFormat::Encoded);
    let (encoded_name, email) = wire.rsplit_once(' ').unwrap();
    assert_eq!("<p@example.gr>", email);
    assert!(encoded_name.contains("\r\n "));

    let decoded: String = encoded_name.split("\r\n ").map(decode).collect();
    assert_eq!(name, decoded);
}

#[test]
fn set_address_accepts_email_or_address() {
    let mut sender = Sender::new();
    sender.set_address("a@b.com", None).unwrap();
    assert_eq!("a@b.com", sender.address().unwrap().email());

    let address = Address::new("c@d.com", Some("Carol")).unwrap();
    sender.set_address(&address, None).unwrap();
    assert_eq!("Sender: Carol <c@d.com>", sender.to_string());

    assert!(matches!(
        sender.set_address("not-an-email", None),
        Err(HeaderError::InvalidInput(_))
    ));
    assert_eq!(Some(&address), sender.address());
}

#[test]
fn custom_encoder_settings() {
    let encoder = MimeEncoder::new("UTF-8").with_line_end("\n");
    let encoded = encoder.encode(&"ü".repeat(30));
    assert!(encoded.contains("\n =?UTF-8?Q?"));
    assert!(!encoded.contains('\r'));
}
