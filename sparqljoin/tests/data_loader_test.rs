/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

extern crate sparqljoin;

use std::io::Write;

use shared::error::Error;
use shared::item::DataType;
use sparqljoin::config::LoaderConfig;
use sparqljoin::data_loader::DataLoader;

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = "\
0\twsdbm:follows\twsdbm:User3
0\tsorg:email\t\"user0@example.org\" .
3\twsdbm:follows\twsdbm:User0
3\twsdbm:hits\t2048
wsdbm:User7\twsdbm:hits\t12

not-a-number\tsorg:email\tbroken@example.org
4\twsdbm:follows
5\twsdbm:follows\twsdbm:User
";

    #[test]
    fn load_builds_one_table_per_property() {
        let (db, stats) = DataLoader::default()
            .load_with_stats(DATASET.as_bytes())
            .unwrap();

        assert_eq!(stats.lines, 8);
        assert_eq!(stats.loaded, 4);
        assert_eq!(stats.dropped, 4);
        assert_eq!(db.property_names(), vec!["sorg:email", "wsdbm:follows", "wsdbm:hits"]);

        let follows = db.table("wsdbm:follows").unwrap();
        assert_eq!(follows.len(), 2);
        assert!(follows.items().iter().all(|item| item.kind() == DataType::Object));
        assert_eq!(follows.items()[0].object(), 3);

        let hits = db.table("wsdbm:hits").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.items()[0].subject(), 3);
        assert_eq!(hits.items()[0].kind(), DataType::Integer);

        let email = db.table("sorg:email").unwrap().items()[0];
        assert_eq!(email.kind(), DataType::String);
        assert_eq!(db.object_dictionary().get(email.object()).unwrap(), "user0@example.org");
        assert_eq!(db.object_dictionary().lookup("broken@example.org"), None);
    }

    #[test]
    fn tables_share_the_global_dictionaries() {
        let db = DataLoader::default().load_reader(DATASET.as_bytes()).unwrap();
        let follows = db.table("wsdbm:follows").unwrap();
        let hits = db.table("wsdbm:hits").unwrap();
        assert!(std::ptr::eq(follows.object_dictionary(), hits.object_dictionary()));
        assert_eq!(db.property_dictionary().len(), 3);
    }

    #[test]
    fn entity_subjects_never_share_an_id() {
        let data = "wsdbm:User7\tfoaf:age\t30\nwsdbm:Product7\tsorg:caption\tsnowfall\n";
        let (db, stats) = DataLoader::default()
            .load_with_stats(data.as_bytes())
            .unwrap();
        assert_eq!(stats.loaded, 0);
        assert_eq!(stats.dropped, 2);
        assert!(db.property_names().is_empty());
        assert!(db.object_dictionary().is_empty());
    }

    #[test]
    fn unknown_table_is_an_error() {
        let db = DataLoader::default().load_reader(DATASET.as_bytes()).unwrap();
        assert!(matches!(db.table("rev:rating"), Err(Error::UnknownProperty(_))));
    }

    #[test]
    fn load_reads_files_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "<http://example.org/subjects/1>\t\
             <http://db.uwaterloo.ca/~galuc/wsdbm/follows>\t\
             <http://db.uwaterloo.ca/~galuc/wsdbm/User2>\n"
        )
        .unwrap();

        let db = DataLoader::default().load(file.path()).unwrap();
        let follows = db.table("wsdbm:follows").unwrap();
        assert_eq!(follows.items()[0].subject(), 1);
        assert_eq!(follows.items()[0].object(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::default()
            .load(dir.path().join("missing.tsv"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn config_changes_separator_and_marker() {
        let config = LoaderConfig::from_json_str(
            r#"{ "separator": ",", "entity_marker": "ex:", "namespaces": [] }"#,
        )
        .unwrap();
        let db = DataLoader::new(config)
            .load_reader("1,ex:knows,ex:Person9\n2,ex:knows,wsdbm:User1\n".as_bytes())
            .unwrap();
        let knows = db.table("ex:knows").unwrap();
        assert_eq!(knows.items()[0].kind(), DataType::Object);
        assert_eq!(knows.items()[0].object(), 9);
        assert_eq!(knows.items()[1].kind(), DataType::String);
    }

    #[test]
    fn config_loads_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "entity_marker": "dbr:" }}"#).unwrap();
        let config = LoaderConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.entity_marker, "dbr:");
        assert_eq!(config.separator, '\t');
    }
}
