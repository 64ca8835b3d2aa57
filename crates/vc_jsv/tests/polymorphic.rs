use vc_jsv::config::Config;
use vc_jsv::derive::Typed;
use vc_jsv::value::Value;
use vc_jsv::{Reflect, from_json, from_jsv, impl_abstract, to_json, to_jsv};

pub trait Animal: Reflect {
    fn sound(&self) -> String;
}

impl_abstract!(dyn Animal);

#[derive(Typed, Default, Debug, PartialEq)]
#[jsv(implements(Animal))]
struct Cat {
    lives: u8,
}

impl Animal for Cat {
    fn sound(&self) -> String {
        "meow".into()
    }
}

#[derive(Typed, Default, Debug, PartialEq)]
#[jsv(type_path = "farm::Cow", implements(Animal))]
struct Cow {
    name: String,
}

impl Animal for Cow {
    fn sound(&self) -> String {
        format!("{} moos", self.name)
    }
}

#[derive(Typed, Default)]
struct Zoo {
    animals: Vec<Box<dyn Animal>>,
}

#[derive(Typed, Default, Debug, PartialEq)]
#[jsv(runtime_serializable, auto_register)]
struct Note {
    text: String,
}

#[derive(Typed, Default)]
#[jsv(auto_register)]
struct Secret {
    text: String,
}

#[derive(Typed, Default)]
struct Envelope {
    body: Value,
}

#[test]
fn abstract_slots_round_trip() {
    let zoo = Zoo {
        animals: vec![Box::new(Cat { lives: 9 }), Box::new(Cow { name: "Bo".into() })],
    };

    let json = to_json(&zoo);
    assert_eq!(
        json,
        r#"{"animals":[{"__type":"polymorphic::Cat","lives":9},{"__type":"farm::Cow","name":"Bo"}]}"#
    );
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["animals"][1]["__type"], "farm::Cow");

    let back: Zoo = from_json(&json).unwrap().unwrap();
    let sounds: Vec<String> = back.animals.iter().map(|a| a.sound()).collect();
    assert_eq!(sounds, ["meow", "Bo moos"]);
    assert_eq!((*back.animals[0]).as_any().downcast_ref::<Cat>(), Some(&Cat { lives: 9 }));

    let jsv = to_jsv(&zoo);
    assert_eq!(
        jsv,
        r#"{animals:[{__type:"polymorphic::Cat",lives:9},{__type:"farm::Cow",name:Bo}]}"#
    );
    let back: Zoo = from_jsv(&jsv).unwrap().unwrap();
    assert_eq!(back.animals.len(), 2);
}

#[test]
fn short_names_resolve_when_unambiguous() {
    let back: Zoo = from_jsv("{animals:[{__type:Cow,name:Al}]}").unwrap().unwrap();
    assert_eq!(back.animals[0].sound(), "Al moos");
}

#[test]
fn untrusted_tags_never_build_values() {
    let back: Zoo = from_json(r#"{"animals":[{"__type":"Evil.Type","x":1},{"lives":1}]}"#)
        .unwrap()
        .unwrap();
    assert!(back.animals.is_empty());

    let envelope: Envelope = from_json(r#"{"body":{"__type":"Evil.Type","x":1}}"#)
        .unwrap()
        .unwrap();
    assert!(matches!(envelope.body, Value::String(_)));

    let envelope: Envelope = from_json(r#"{"body":{"__type":"polymorphic::Secret","text":"x"}}"#)
        .unwrap()
        .unwrap();
    assert!(envelope.body.downcast_ref::<Secret>().is_none());
}

#[test]
fn trusted_tags_in_loose_slots() {
    let envelope = Envelope {
        body: Value::Object(Box::new(Note { text: "hi".into() })),
    };
    let json = to_json(&envelope);
    assert_eq!(json, r#"{"body":{"__type":"polymorphic::Note","text":"hi"}}"#);

    let back: Envelope = from_json(&json).unwrap().unwrap();
    assert_eq!(back.body.downcast_ref::<Note>(), Some(&Note { text: "hi".into() }));

    let mut config = Config::default();
    config.allow_runtime_markers.clear();
    let back: Envelope = vc_jsv::JsonSerializer::deserialize_with(&json, &config)
        .unwrap()
        .unwrap();
    assert!(back.body.downcast_ref::<Note>().is_none());

    config.allow_runtime_namespaces.push("polymorphic".into());
    let back: Envelope = vc_jsv::JsonSerializer::deserialize_with(&json, &config)
        .unwrap()
        .unwrap();
    assert!(back.body.downcast_ref::<Note>().is_some());
}

#[test]
fn loose_slots_read_plain_text() {
    let back: Envelope = from_json(r#"{"body":{"a":[1,"x"]}}"#).unwrap().unwrap();
    assert!(matches!(back.body, Value::String(_)));

    let _scope = Config::scope_from_str("cotisd,ttpptv").unwrap();
    let back: Envelope = from_json(r#"{"body":{"a":[1,"x"],"b":true}}"#).unwrap().unwrap();
    let body = back.body.as_map().unwrap();
    assert_eq!(body["b"].as_bool(), Some(true));
    let items = body["a"].as_list().unwrap();
    assert_eq!(items[0].as_i64(), Some(1));
    assert_eq!(items[1].as_str(), Some("x"));
}
