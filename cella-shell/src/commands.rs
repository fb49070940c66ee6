use anyhow::{anyhow, bail, Context};
use cella::collection::{Collection, Document, Index};
use cella::filter::QuerySpec;
use cella::store::Store;
use std::io::Write;

pub const HELP: &str = "\
commands:
  collections                     list collection names
  count <collection>              number of documents
  all <collection>                every document, one per line
  get <collection> <id>           one document by id
  find <collection> <json-spec>   documents matching a JSON query spec
  help                            this text
  exit | quit                     leave the shell";

/// One parsed shell line.
#[derive(Debug, PartialEq)]
pub enum Command {
    Collections,
    Count(String),
    All(String),
    Get(String, Index),
    Find(String, QuerySpec),
    Help,
    Exit,
    Empty,
    Unknown(String),
}

/// Whether the shell keeps reading after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

impl Command {
    /// Parses a line. Malformed arguments of a known command are errors;
    /// an unknown command word is not.
    pub fn parse(line: &str) -> anyhow::Result<Command> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "" => Command::Empty,
            "collections" => Command::Collections,
            "count" => Command::Count(single_argument(word, rest)?),
            "all" => Command::All(single_argument(word, rest)?),
            "get" => {
                let (name, id) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: get <collection> <id>"))?;
                Command::Get(name.to_string(), Index::parse(id.trim()))
            }
            "find" => {
                let (name, spec) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: find <collection> <json-spec>"))?;
                let value: serde_json::Value =
                    serde_json::from_str(spec.trim()).context("query spec is not valid JSON")?;
                Command::Find(name.to_string(), QuerySpec::from_json(&value)?)
            }
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        };
        Ok(command)
    }

    /// Runs the command against the store, writing its output to `out`.
    pub fn execute<W: Write>(&self, store: &Store, out: &mut W) -> anyhow::Result<Flow> {
        match self {
            Command::Collections => {
                for name in store.collection_names() {
                    writeln!(out, "{}", name)?;
                }
            }
            Command::Count(name) => {
                if let Some(collection) = existing(store, name, out)? {
                    writeln!(out, "{}", collection.count())?;
                }
            }
            Command::All(name) => {
                if let Some(collection) = existing(store, name, out)? {
                    print_documents(&collection.all(), out)?;
                }
            }
            Command::Get(name, id) => {
                if let Some(collection) = existing(store, name, out)? {
                    match collection.get(id.clone()) {
                        Some(document) => writeln!(out, "{}", document)?,
                        None => writeln!(out, "not found")?,
                    }
                }
            }
            Command::Find(name, spec) => {
                if let Some(collection) = existing(store, name, out)? {
                    log::debug!("find on {} where {}", name, spec.parse());
                    print_documents(&collection.query(spec), out)?;
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Exit => return Ok(Flow::Exit),
            Command::Empty => {}
            Command::Unknown(word) => writeln!(out, "unknown command: {}", word)?,
        }
        Ok(Flow::Continue)
    }
}

fn single_argument(word: &str, rest: &str) -> anyhow::Result<String> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        bail!("usage: {} <collection>", word);
    }
    Ok(rest.to_string())
}

fn existing<W: Write>(store: &Store, name: &str, out: &mut W) -> anyhow::Result<Option<Collection>> {
    let collection = store.get_collection(name);
    if collection.is_none() {
        writeln!(out, "collection not found: {}", name)?;
    }
    Ok(collection)
}

fn print_documents<W: Write>(documents: &[Document], out: &mut W) -> anyhow::Result<()> {
    for document in documents {
        writeln!(out, "{}", document)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cella::doc;
    use cella::filter::gt;

    fn store() -> Store {
        let store = Store::in_memory();
        let test = store.collection("test").unwrap();
        test.insert_with_id(doc! { "age": 10, "sex": "M" }, 1).unwrap();
        test.insert_with_id(doc! { "age": 24, "sex": "F" }, 2).unwrap();
        store
    }

    fn run(store: &Store, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = Command::parse(line).unwrap().execute(store, &mut out).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("collections").unwrap(), Command::Collections);
        assert_eq!(Command::parse("  count test ").unwrap(), Command::Count("test".into()));
        assert_eq!(Command::parse("get test 2").unwrap(), Command::Get("test".into(), Index::Int(2)));
        assert_eq!(Command::parse("get test ann").unwrap(), Command::Get("test".into(), Index::from("ann")));
        assert_eq!(Command::parse("get test 007").unwrap(), Command::Get("test".into(), Index::from("007")));
        assert_eq!(
            Command::parse(r#"find test {"age": {"$gt": 10}}"#).unwrap(),
            Command::Find("test".into(), QuerySpec::new().field("age", gt(10)))
        );
        assert_eq!(Command::parse("").unwrap(), Command::Empty);
        assert_eq!(Command::parse("quit").unwrap(), Command::Exit);
        assert_eq!(Command::parse("drop test").unwrap(), Command::Unknown("drop".into()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("count").is_err());
        assert!(Command::parse("get test").is_err());
        assert!(Command::parse("find test {oops").is_err());
        assert!(Command::parse(r#"find test {"age": {"$in": [1]}}"#).is_err());
    }

    #[test]
    fn test_collections_and_count() {
        let store = store();
        assert_eq!(run(&store, "collections").1, "test\n");
        assert_eq!(run(&store, "count test").1, "2\n");
    }

    #[test]
    fn test_all_get_and_find() {
        let store = store();
        assert_eq!(
            run(&store, "all test").1,
            "{\"_id\":1,\"age\":10,\"sex\":\"M\"}\n{\"_id\":2,\"age\":24,\"sex\":\"F\"}\n"
        );
        assert_eq!(run(&store, "get test 2").1, "{\"_id\":2,\"age\":24,\"sex\":\"F\"}\n");
        assert_eq!(run(&store, "get test 9").1, "not found\n");
        assert_eq!(
            run(&store, r#"find test {"sex": "M"}"#).1,
            "{\"_id\":1,\"age\":10,\"sex\":\"M\"}\n"
        );
    }

    #[test]
    fn test_missing_collection_is_not_created() {
        let store = store();
        assert_eq!(run(&store, "count ghost").1, "collection not found: ghost\n");
        assert!(!store.has_collection("ghost"));
    }

    #[test]
    fn test_unknown_command_leaves_store_alone() {
        let store = store();
        let before = store.serialize().unwrap();
        let (flow, output) = run(&store, "insert test {}");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(output, "unknown command: insert\n");
        assert_eq!(store.serialize().unwrap(), before);
    }

    #[test]
    fn test_exit() {
        assert_eq!(run(&store(), "exit").0, Flow::Exit);
    }
}
