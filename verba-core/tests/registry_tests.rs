use std::sync::Arc;
use std::thread;

use verba_core::locale::Confidence;
use verba_core::{
    Context, LoadError, LocaleRegistry, Replace, Translate, Translator, include_dictionary, loader,
    t,
};

fn locales_dir() -> String {
    format!("{}/tests/locales", env!("CARGO_MANIFEST_DIR"))
}

fn tags(registry: &LocaleRegistry) -> Vec<String> {
    registry.tags().iter().map(ToString::to_string).collect()
}

#[test]
fn loads_directory_with_default_first() {
    let registry = LocaleRegistry::from_dir(locales_dir(), Some("ja")).unwrap();
    assert_eq!(tags(&registry), vec!["ja", "en", "pt-BR"]);

    // 无匹配时使用默认语言
    let tr = registry.select("de,fr;q=0.7");
    assert_eq!(tr.translate("Cancel"), "キャンセル");
}

#[test]
fn loads_directory_in_file_name_order() {
    let registry = LocaleRegistry::from_dir(locales_dir(), None).unwrap();
    assert_eq!(tags(&registry), vec!["en", "ja", "pt-BR"]);
    assert_eq!(registry.select("").translate("Cancel"), "Cancel");
}

#[test]
fn lists_dictionary_files_only() {
    let names: Vec<String> = loader::dictionary_files(locales_dir())
        .unwrap()
        .iter()
        .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
        .collect();
    assert_eq!(names, vec!["en.json", "ja.json", "pt-BR.yaml"]);

    let err = loader::dictionary_files(format!("{}/missing", locales_dir())).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn missing_default_locale_is_an_error() {
    let err = LocaleRegistry::from_dir(locales_dir(), Some("fr")).unwrap_err();
    assert!(matches!(err, LoadError::MissingDefault(tag) if tag == "fr"));
}

#[test]
fn missing_directory_is_an_io_error() {
    let err = LocaleRegistry::from_dir("/this/path/should/not/exist", None).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn due_in_days_ranges() {
    let registry = LocaleRegistry::from_dir(locales_dir(), Some("en")).unwrap();
    let en = registry.select("en-US");

    let cases = [
        (-5, "Due 5 days ago"),
        (-2, "Due 2 days ago"),
        (-1, "Due yesterday"),
        (0, "Due today"),
        (1, "Due tomorrow"),
        (2, "Due in 2 days"),
        (30, "Due in 30 days"),
    ];
    for (count, expected) in cases {
        assert_eq!(t!(en, "Due in %n days", count), expected, "count {}", count);
    }

    let ja = registry.select("ja-JP");
    assert_eq!(t!(ja, "Due in %n days", -3), "3日前に期限切れ");
    assert_eq!(t!(ja, "Due in %n days", 0), "今日が期限");
    assert_eq!(t!(ja, "Due in %n days", 4), "期限まであと4日");
}

#[test]
fn yaml_dictionary_with_context() {
    let registry = LocaleRegistry::from_dir(locales_dir(), Some("en")).unwrap();
    let pt = registry.select("pt-br,pt;q=0.8");
    assert_eq!(pt.tag().map(ToString::to_string), Some("pt-BR".to_string()));

    assert_eq!(t!(pt, "%n comments", 0), "Nenhum comentário");
    assert_eq!(t!(pt, "%n comments", 1), "1 comentário");
    assert_eq!(t!(pt, "%n comments", 12), "12 comentários");

    let replace = Replace::from([("name", "Ana")]);
    assert_eq!(
        t!(pt, "%{name} updated their profile", replace.clone(), Context::from([("gender", "female")])),
        "Ana atualizou o perfil dela"
    );
    // 根表无此键时回退到键本身
    assert_eq!(
        t!(pt, "%{name} updated their profile", replace),
        "Ana updated their profile"
    );
}

#[test]
fn portuguese_from_portugal_falls_to_brazilian() {
    let registry = LocaleRegistry::from_dir(locales_dir(), Some("en")).unwrap();
    let negotiated = registry.negotiate("pt-PT").unwrap();
    assert_eq!(negotiated.tag.to_string(), "pt-BR");
    assert_eq!(negotiated.confidence, Confidence::Prefix);
}

#[test]
fn embedded_dictionaries() {
    let en = include_dictionary!("locales/en.json").unwrap();
    let pt = include_dictionary!("locales/pt-BR.yaml", yaml).unwrap();

    let mut tr = Translator::from_dictionary(en);
    tr.add(pt);
    tr.set_context("gender", "female");

    assert_eq!(tr.translate("Cancel"), "Cancelar");
    assert_eq!(t!(tr, "Due in %n days", 1), "Due tomorrow");
    // 后合并的 context 规则排在后面，先匹配到的规则生效
    assert_eq!(
        t!(tr, "%{name} updated their profile", Replace::from([("name", "Ana")])),
        "Ana updated her profile"
    );
}

#[test]
fn selected_translators_are_shared_across_threads() {
    let registry = Arc::new(LocaleRegistry::from_dir(locales_dir(), Some("en")).unwrap());

    let handles: Vec<_> = ["ja", "en", "pt-BR", "de"]
        .into_iter()
        .map(|header| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let tr = registry.select(header);
                (0..100)
                    .map(|_| tr.translate("Cancel"))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let expected = ["キャンセル", "Cancel", "Cancelar", "Cancel"];
    for (handle, expected) in handles.into_iter().zip(expected) {
        let results = handle.join().unwrap();
        assert!(results.iter().all(|text| text == expected));
    }
}
