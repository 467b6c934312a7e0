use mecab_ko::{make_entry, DictionaryLoadOptions, SaveOutcome, UserDictionary};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "nnp.csv".to_string());

    let mut dictionary = UserDictionary::new();
    for source in args {
        let options =
            DictionaryLoadOptions::default().with_file_pattern(r"^(nnp|person|place).*\.csv$")?;
        dictionary.merge(UserDictionary::load_with_options(&source, &options)?);
    }

    dictionary.add_proper_noun("까비")?;
    dictionary.add_entry("코로나", "NNP", "*", None)?;
    dictionary.push(make_entry("서울", "NNP", "지명", Some("서울"))?);

    for entry in &dictionary {
        println!("{}", entry.to_fields().join(","));
    }

    match dictionary.save(&output)? {
        SaveOutcome::Written { path, entries } => {
            println!("wrote {entries} entries to {}", path.display())
        }
        SaveOutcome::Empty => println!("No userdic to save"),
    }

    Ok(())
}
