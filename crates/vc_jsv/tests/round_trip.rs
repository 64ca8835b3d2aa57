use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use vc_jsv::config::{Config, DateHandler};
use vc_jsv::derive::Typed;
use vc_jsv::time::{DateTime, DateTimeKind};
use vc_jsv::{from_json, from_jsv, to_json, to_jsv};

#[derive(Typed, Default, Debug, Clone, Copy, PartialEq)]
enum Level {
    #[default]
    Low,
    High = 10,
}

#[derive(Typed, Default, Debug, PartialEq)]
struct Address {
    street: String,
    zip: Option<u32>,
}

#[derive(Typed, Default, Debug, PartialEq)]
struct Customer {
    user_name: String,
    age: u8,
    level: Level,
    nick: Option<String>,
    tags: Vec<String>,
    home: Address,
    scores: BTreeMap<String, Vec<i64>>,
    id: uuid::Uuid,
}

fn customer() -> Customer {
    Customer {
        user_name: "Zoë, Lee".into(),
        age: 42,
        level: Level::High,
        nick: None,
        tags: vec!["a b".into(), "c,d".into()],
        home: Address {
            street: "1 \"Main\" St".into(),
            zip: Some(1234),
        },
        scores: [("math".into(), vec![1, -2])].into(),
        id: uuid::Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef),
    }
}

#[test]
fn nested_graph_round_trips_in_both_formats() {
    let value = customer();

    let json = to_json(&value);
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["user_name"], "Zoë, Lee");
    assert_eq!(parsed["level"], "High");
    assert_eq!(parsed["home"]["street"], "1 \"Main\" St");
    assert_eq!(parsed["scores"]["math"][1], -2);
    assert_eq!(parsed["id"], "0123456789abcdef0123456789abcdef");
    assert!(parsed.get("nick").is_none());
    assert!(json.contains("\\u00eb"), "{json}");
    assert_eq!(from_json::<Customer>(&json).unwrap(), Some(customer()));

    let jsv = to_jsv(&value);
    assert!(jsv.starts_with(r#"{user_name:"Zoë, Lee",age:42,level:High,tags:[a b,"c,d"],"#), "{jsv}");
    assert_eq!(from_jsv::<Customer>(&jsv).unwrap(), Some(customer()));
}

#[test]
fn primitives_and_containers() {
    assert_eq!(to_json(&true), "true");
    assert_eq!(to_jsv(&String::from("plain text")), "plain text");
    assert_eq!(to_json(&Some(2.5_f64)), "2.5");
    assert_eq!(from_jsv::<u64>("18446744073709551615").unwrap(), Some(u64::MAX));
    assert_eq!(from_json::<Option<i8>>("null").unwrap(), Some(None));

    let map: HashMap<String, u32> = [("k".to_string(), 1)].into();
    let json = to_json(&map);
    assert_eq!(json, r#"{"k":1}"#);
    assert_eq!(from_json::<HashMap<String, u32>>(&json).unwrap(), Some(map));

    assert!(from_json::<u8>("300").is_err());
    assert!(from_jsv::<bool>("maybe").is_err());
}

#[test]
fn trailing_comma_keeps_an_empty_slot() {
    assert_eq!(from_jsv::<Vec<i32>>("[1,2,]").unwrap(), Some(vec![1, 2, 0]));
    assert_eq!(from_json::<Vec<i32>>("[]").unwrap(), Some(vec![]));
}

#[test]
fn missing_braces_are_tolerated() {
    let back: Address = from_jsv("street:x,zip:7").unwrap().unwrap();
    assert_eq!(
        back,
        Address {
            street: "x".into(),
            zip: Some(7)
        }
    );
}

#[test]
fn lenient_member_names() {
    #[derive(Typed, Default)]
    struct Toggle {
        foo_bar: u8,
    }

    let strict: Toggle = from_json(r#"{"FooBar":3}"#).unwrap().unwrap();
    assert_eq!(strict.foo_bar, 0);
    let strict: Toggle = from_json(r#"{"FOO_BAR":3}"#).unwrap().unwrap();
    assert_eq!(strict.foo_bar, 3);

    let _scope = Config::scope_from_str("pc:lenient").unwrap();
    let lenient: Toggle = from_json(r#"{"FooBar":3}"#).unwrap().unwrap();
    assert_eq!(lenient.foo_bar, 3);
    let lenient: Toggle = from_jsv("{foo-bar:4}").unwrap().unwrap();
    assert_eq!(lenient.foo_bar, 4);
}

#[test]
fn option_strings_scope_the_config() {
    #[derive(Typed, Default)]
    struct Contact {
        user_name: String,
        nick: Option<String>,
        level: Level,
    }

    let value = Contact {
        user_name: "ann".into(),
        ..Default::default()
    };
    {
        let _scope = Config::scope_from_str("eccn,inv,teai").unwrap();
        assert_eq!(to_json(&value), r#"{"userName":"ann","nick":null,"level":0}"#);
    }
    {
        let _scope = Config::scope_from_str("elun,ide:false").unwrap();
        assert_eq!(to_jsv(&value), "{user_name:ann}");
    }
    assert_eq!(to_jsv(&value), "{user_name:ann,level:Low}");
    assert!(Config::scope_from_str("no_such_option").is_err());
}

#[test]
fn dates_follow_the_handler() {
    #[derive(Typed, Default, Debug, Clone, PartialEq)]
    struct Event {
        at: DateTime,
        took: TimeDelta,
    }

    let event = Event {
        at: DateTime::from_ymd_hms(2020, 3, 4, 5, 6, 7, DateTimeKind::Utc).unwrap(),
        took: TimeDelta::seconds(3600),
    };

    let _utc = Config::scope_with(|c| c.always_use_utc = true);
    let json = to_json(&event);
    assert_eq!(json, r#"{"at":"\/Date(1583298367000)\/","took":"PT1H"}"#);
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["at"], "/Date(1583298367000)/");
    assert_eq!(from_json::<Event>(&json).unwrap(), Some(event.clone()));

    assert_eq!(to_jsv(&event), "{at:2020-03-04T05:06:07Z,took:PT1H}");

    {
        let _iso = Config::scope_with(|c| c.date_handler = DateHandler::Iso8601);
        let json = to_json(&event);
        assert!(json.contains(r#""at":"2020-03-04T05:06:07.0000000Z""#), "{json}");
        assert_eq!(from_json::<Event>(&json).unwrap().unwrap().at, event.at);
    }
    {
        let _standard = Config::scope_from_str("tsh:sf").unwrap();
        assert_eq!(to_jsv(&event), "{at:2020-03-04T05:06:07Z,took:01:00:00}");
        let back: Event = from_jsv("{took:1.02:03:04.5}").unwrap().unwrap();
        assert_eq!(back.took, TimeDelta::milliseconds(93_784_500));
    }
}

/// The value a date reads back as under `handler`, in UTC.
fn read_back_as(handler: DateHandler, value: DateTime) -> DateTime {
    let whole_seconds = |naive: NaiveDateTime| naive.with_nanosecond(0).unwrap();
    match handler {
        DateHandler::UnixTime | DateHandler::Rfc1123 => {
            DateTime::utc(whole_seconds(value.to_utc().naive()))
        }
        DateHandler::Iso8601DateOnly => DateTime::utc(value.naive().date().and_time(NaiveTime::MIN)),
        DateHandler::Iso8601DateTime => DateTime::unspecified(whole_seconds(value.naive())).to_utc(),
        _ => value.to_utc(),
    }
}

#[test]
fn dates_round_trip_under_every_handler() {
    let midnight = DateTime::from_ymd_hms(2020, 3, 4, 0, 0, 0, DateTimeKind::Utc).unwrap();
    let fraction = DateTime::from_ymd_hms(2020, 3, 4, 5, 6, 7, DateTimeKind::Utc)
        .and_then(|d| d.checked_add(TimeDelta::milliseconds(123)))
        .unwrap();
    let local = DateTime::from_ymd_hms(2020, 3, 4, 5, 6, 7, DateTimeKind::Local)
        .and_then(|d| d.checked_add(TimeDelta::milliseconds(450)))
        .unwrap();
    let epoch = DateTime::from_unix_millis(0).unwrap();

    for handler in [
        DateHandler::TimestampOffset,
        DateHandler::DcjsCompatible,
        DateHandler::Iso8601,
        DateHandler::Iso8601DateOnly,
        DateHandler::Iso8601DateTime,
        DateHandler::Rfc1123,
        DateHandler::UnixTime,
        DateHandler::UnixTimeMs,
    ] {
        let _scope = Config::scope_with(|c| {
            c.date_handler = handler;
            c.always_use_utc = true;
        });
        for value in [midnight, fraction, local, epoch] {
            let json = to_json(&value);
            let back = from_json::<DateTime>(&json).unwrap().unwrap();
            assert_eq!(back, read_back_as(handler, value), "{handler:?} json {json}");

            // JSV always writes the shortest lossless form.
            let jsv = to_jsv(&value);
            let back = from_jsv::<DateTime>(&jsv).unwrap().unwrap();
            assert_eq!(back, value.to_utc(), "{handler:?} jsv {jsv}");
        }
    }
}

#[test]
fn html_chars_are_escaped_on_request() {
    let text = String::from("<b>&</b>");
    assert_eq!(to_json(&text), r#""<b>&</b>""#);

    let _scope = Config::scope_from_str("ehc").unwrap();
    let json = to_json(&text);
    assert_eq!(json, r#""\u003cb\u003e\u0026\u003c/b\u003e""#);
    assert_eq!(from_json::<String>(&json).unwrap(), Some(text));
}

#[test]
fn malformed_dates_are_errors() {
    assert!(from_json::<DateTime>(r#""\/Date(0+aé)\/""#).is_err());
    assert!(from_json::<DateTime>(r#""2020-01-01T00:00:00.ééé""#).is_err());
    assert!(from_jsv::<TimeDelta>("P18446744073709551615D").is_err());
}

#[test]
fn member_errors_follow_throw_on_error() {
    let lenient: Address = from_json(r#"{"street":"x","zip":"abc"}"#).unwrap().unwrap();
    assert_eq!(lenient.zip, None);
    assert_eq!(lenient.street, "x");

    let _strict = Config::scope_from_str("toe").unwrap();
    assert!(from_json::<Address>(r#"{"street":"x","zip":"abc"}"#).is_err());
}
