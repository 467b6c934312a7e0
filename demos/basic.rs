use mecab_ko::Mecab;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Uses MECAB_LIBRARY_PATH / MECAB_DIC_PATH when set.
    let mecab = Mecab::new()?;
    println!("mecab {}", mecab.analyzer().library().version()?);

    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "아버지가방에들어가신다.".to_string());

    for token in mecab.parse(&text)? {
        println!("{}\t{}", token.surface, token.feature);
    }

    println!("pos:     {:?}", mecab.pos_joined(&text, true)?);
    println!("split:   {:?}", mecab.pos_joined(&text, false)?);
    println!("morphs:  {:?}", mecab.morphs(&text, false)?);
    println!("nouns:   {:?}", mecab.nouns(&text, true)?);

    if let Some(path) = mecab.dictionary_path()? {
        println!("dictionary: {}", path.display());
    }

    Ok(())
}
