//! The shipped exercise sequence
//!
//! Order matters: later exercises work on files earlier ones created or
//! asked the learner to create.

use crate::exercise::{Exercise, Prompt};
use super::steps::{Check, Plan, Setup};

/// Fixture archive the learner downloads
pub const CHAOS_URL: &str = "https://smits-net.de/files/ei/chaos.tar.xz";

/// Exact byte size of the fixture archive
pub const CHAOS_ARCHIVE_BYTES: u64 = 5_454_500;

/// Entries in the unpacked archive, excluding dot files
pub const CHAOS_ENTRY_COUNT: usize = 65_538;

/// `.txt` files in the unpacked archive
pub const CHAOS_TXT_FILE_COUNT: i64 = 32_771;

const HIGHLANDER: &str = "Es kann nur einen geben!\n\n";

fn question(text: &str) -> Prompt {
    Prompt::Question(text.to_string())
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// All exercises, in order. `project` is the course directory name shown
/// in the instructions.
pub fn catalog(project: &str) -> Vec<Exercise> {
    vec![
        Exercise::new(
            "Hilfe",
            "Lernen Sie, sich die Hilfe von Programmen anzeigen zu lassen.",
            r#"
            Sie möchten mehr über ein Linux-Kommando erfahren. Dies erfolgt bei den meisten Kommandos über den Befehl "man". Bei manchen Kommandos kann man auch als Option "--help" angeben.

            Geben Sie "man ls" ein und finden Sie heraus, mit welcher Option von ls man die Einträge nach dem Datum der letzten Veränderung sortieren kann.
            "#,
            question("Wie lautet das gesuchte Kommando (inklusive ls)?"),
            "ls -t",
            Plan::check(Check::answer("ls -t")),
        ),
        Exercise::new(
            "Erstkontakt",
            "Lernen Sie in Verzeichnisse zu wechseln (cd) und Dateien zu editieren (vi / nano).",
            format!(r#"
            Sie möchten eine Datei mit Ihrem Lieblingsfilm anlegen - der übrigens "Pulp Fiction" heißt.

            Gehen Sie in das Verzeichnis "{project}" und legen Sie dort eine Datei mit dem Namen "film.txt" an, in die Sie "Pulp Fiction" schreiben. Verwenden Sie hierzu entweder den Editor vi oder nano.
            "#),
            Prompt::Confirm,
            r#"cd ; cd linux-kurs ; echo "Pulp Fiction" > film.txt"#,
            Plan::check(Check::FileContent {
                path: "film.txt".into(),
                expected: "Pulp Fiction".to_string(),
            })
            .with_setup(Setup::ProjectDir),
        ),
        Exercise::new(
            "Datei editieren",
            "Eine vorhandene Datei mit einem Editor bearbeiten.",
            format!(r#"
            Sie möchten eine Datei mit Lieblingsfilmen von jemand anderem editieren.

            Gehen Sie in das Verzeichnis "{project}" und editieren Sie die Datei "prof-filme.txt", die dort liegt. Entfernen Sie den Film "Blade Runner", den Sie (unverständlicherweise) persönlich nicht mögen.
            "#),
            Prompt::Confirm,
            "vi prof-filme.txt; J DD :w :q",
            Plan::check(Check::FileContent {
                path: "prof-filme.txt".into(),
                expected: "Pulp Fiction\nAlien\nFight Club".to_string(),
            })
            .with_setup(Setup::WriteFile {
                path: "prof-filme.txt".into(),
                contents: "Pulp Fiction\nBlade Runner\nAlien\nFight Club\n".to_string(),
            }),
        ),
        Exercise::new(
            "Der Preis eines Schnitzels",
            "Machen Sie sich mit der Funktionsweise von cd, ls, less und more vertraut.",
            format!(r#"
            Sie führen ein Schnitzelrestaurant und haben leider vergessen, was Sie für Ihre Gerichte verlangen.

            Zum Glück haben Sie die Speisekarte in der Datei "speisekarte.txt" im "{project}"-Ordner gespeichert.

            Schauen Sie in der Datei nach dem Preis für ein Wiener Schnitzel.
            "#),
            question("Welchen Preis hat das Wiener Schnitzel?"),
            "less speisekarte.txt",
            Plan::check(Check::answer("23,42")).with_setup(Setup::WriteFile {
                path: "speisekarte.txt".into(),
                contents: "Wiener Schnitzel 23,42\nJägerschnitzel 28,44\nBauernschnitzel 24,13".to_string(),
            }),
        ),
        Exercise::new(
            "Life, Death & Taxes",
            "Machen Sie sich mit der Funktionsweise von mkdir und cp vertraut.",
            format!(r#"
            Der Steuerberater Ihres Restaurants braucht ein paar Unterlagen von Ihnen.

            Erstellen Sie für ihn einen Ordner "tax-man" im "{project}"-Verzeichnis.

            Kopieren Sie die Datei "speisekarte.txt" aus dem "{project}"-Verzeichnis in das "tax-man"-Verzeichnis.
            "#),
            Prompt::Confirm,
            "mkdir tax-man; cp speisekarte.txt tax-man/",
            Plan::check(Check::SameContent(
                "speisekarte.txt".into(),
                "tax-man/speisekarte.txt".into(),
            )),
        ),
        Exercise::new(
            "Geld stinkt nicht",
            "Machen Sie sich mit der Funktionsweise von mv vertraut.",
            format!(r#"
            Ihr Steuerberater braucht noch weitere Unterlagen, die alle im Ordner "{project}/laundry" liegen.

            Bewegen Sie den Ordner "laundry", samt seines Inhaltes, in das "tax-man"-Verzeichnis in "{project}".
            "#),
            Prompt::Confirm,
            "mv laundry tax-man",
            Plan::check(Check::All(
                std::iter::once(Check::IsDir("tax-man/laundry".into()))
                    .chain(std::iter::once(Check::Absent("laundry".into())))
                    .chain(('a'..='z').map(|l| Check::Exists(format!("tax-man/laundry/{}", l).into())))
                    .collect(),
            ))
            .with_setup(Setup::CreateDir { path: "laundry".into(), mode: 0o700 })
            .with_setup(Setup::Alphabet {
                path: "laundry".into(),
                contents: "--egal--".to_string(),
            }),
        ),
        Exercise::new(
            "Unter den Teppich kehren",
            "Machen Sie sich mit der Funktionsweise von rm vertraut.",
            format!(r#"
            Sie sind sich klar geworden, dass man eine Speisekarte vielleicht doch nicht als .txt-Datei verwaltet und haben sie bereits in ein passendes Format übertragen.

            Löschen Sie die Datei "speisekarte.txt" aus dem "{project}"-Verzeichnis.
            "#),
            Prompt::Confirm,
            "rm speisekarte.txt",
            Plan::check(Check::Absent("speisekarte.txt".into())),
        ),
        Exercise::new(
            "Wer bin ich?",
            "Machen Sie sich mit der Funktionsweise von whoami vertraut.",
            r#"
            Finden Sie heraus, als welcher Benutzer Sie im System angemeldet sind.
            "#,
            question("Tragen Sie hier ein, wie Ihr Benutzer heißt:"),
            "whoami",
            Plan::check(Check::CurrentUser),
        ),
        Exercise::new(
            "Wem gehört denn das?",
            "Vertiefen Sie Ihr Wissen zu ls.",
            format!(r#"
            Sie verwalten Dateien zu zwielichtigen Geschäften im Ordner "shady-business" im "{project}"-Verzeichnis.

            Finden Sie heraus, welcher Benutzer der Besitzer des Ordners "shady-business" ist.
            "#),
            question("Tragen Sie hier den Namen des Besitzers ein:"),
            "ls -axl",
            Plan::check(Check::CurrentUser)
                .with_setup(Setup::CreateDir { path: "shady-business".into(), mode: 0o700 }),
        ),
        Exercise::new(
            "What a Superuser can do",
            "Machen Sie sich mit der Funktionsweise von sudo und chown vertraut.",
            r#"
            Nutzen Sie die Macht eines Superusers und setzen Sie den Besitzer des Ordners "shady-business" auf "nobody", damit man Ihnen später nichts nachsagen kann.
            "#,
            Prompt::Confirm,
            "sudo chown nobody shady-business",
            Plan::check(Check::Owner {
                path: "shady-business".into(),
                user: "nobody".to_string(),
            })
            .with_setup(Setup::CreateDir { path: "shady-business".into(), mode: 0o700 })
            .with_setup(Setup::FillDecoys { path: "shady-business".into() }),
        ),
        Exercise::new(
            "Move on...there is nothing to see here",
            "Frischen Sie Ihr Wissen zu mv ein wenig auf.",
            r#"
            Das Finanzamt hat Unstimmigkeiten in Ihrer Steuererklärung festgestellt und Sie wollen Ihre Spuren zu den zwielichtigen Geschäften verwischen.

            Ändern Sie den Namen des Ordners "shady-business" in "nothing-to-see-here" um.
            "#,
            Prompt::Confirm,
            "sudo mv shady-business nothing-to-see-here",
            Plan::check(Check::All(vec![
                Check::Absent("shady-business".into()),
                Check::Exists("nothing-to-see-here".into()),
            ])),
        ),
        Exercise::new(
            "Read, Write and Execute",
            "Machen Sie sich mit der Funktionsweise von chmod vertraut.",
            r#"
            Ihre Geschäftspartner brauchen Zugang zu den zwielichtigen Dokumenten.

            Ändern Sie die Zugriffsrechte des "nothing-to-see-here"-Ordners so, dass jeder Benutzer darin lesen, schreiben und ausführen kann.
            "#,
            Prompt::Confirm,
            "sudo chmod og+rwx nothing-to-see-here",
            Plan::check(Check::Permissions {
                path: "nothing-to-see-here".into(),
                accepted: strings(&["777", "707"]),
            }),
        ),
        Exercise::new(
            "Ist das Kunst, oder kann das weg?",
            "Frischen Sie Ihr Wissen zu rm ein wenig auf.",
            r#"
            Die Steuerfahndung ist Ihnen auf der Spur und Ihnen wird die Sache zu heiß. Sie entscheiden sich, alle Dokumente, die Sie mit zwielichtigen Geschäften in Verbindung bringen könnten, zu löschen.

            Löschen Sie den Ordner "nothing-to-see-here", zusammen mit seinem Inhalt.
            "#,
            Prompt::Confirm,
            "rm -rf nothing-to-see-here",
            Plan::check(Check::Absent("nothing-to-see-here".into())),
        ),
        Exercise::new(
            "Ein neues Kapitel",
            "Machen Sie sich mit der Funktionsweise von wget vertraut.",
            format!(r#"
            Sie haben sich auf eine karibische Insel abgesetzt und wollen dort mit einem Schnitzelrestaurant wieder neu anfangen, diesmal aber ohne zwielichtige Geschäftspraktiken. Noch in Deutschland haben Sie wichtige Dokumente archiviert und online gestellt.

            Laden Sie die Ressource unter: {CHAOS_URL}

            ...in das "{project}"-Verzeichnis herunter.
            "#),
            Prompt::Confirm,
            format!("wget {}", CHAOS_URL),
            Plan::check(Check::FileSize {
                path: "chaos.tar.xz".into(),
                bytes: CHAOS_ARCHIVE_BYTES,
            }),
        ),
        Exercise::new(
            "Archive",
            "Machen Sie sich mit der Funktionsweise von tar vertraut.",
            format!(r#"
            Die Dokumente wurden in einem Archiv gespeichert, um sie kompakt und gebündelt zu verwalten.

            Entpacken Sie das heruntergeladene Archiv in den Ordner "{project}".
            "#),
            Prompt::Confirm,
            "tar -xJf chaos.tar.xz",
            Plan::check(Check::EntryCount {
                path: "chaos".into(),
                count: CHAOS_ENTRY_COUNT,
            }),
        ),
        Exercise::new(
            "Find what you search for",
            "Machen Sie sich mit der Funktionsweise von find vertraut.",
            format!(r#"
            Sie wollen sich erst einmal einen Überblick über die wichtigsten Dokumente verschaffen, die alle als .txt-Dateien in "{project}/chaos" gespeichert sind.

            Finden Sie alle .txt-Dateien im "chaos"-Ordner (und den Unterordnern).
            "#),
            question("Tragen Sie hier ein, wie viele .txt-Dateien im Ordner vorhanden sind:"),
            r#"find chaos/ -name "*.txt" | wc"#,
            Plan::check(Check::Number(CHAOS_TXT_FILE_COUNT)),
        ),
        Exercise::new(
            "Find the key",
            "Machen Sie sich mit der Funktionsweise von grep vertraut.",
            format!(r##"
            Sie suchen nach einem wichtigen Passwort, wissen aber nicht mehr, wo es steht.

            Sie wissen nur, dass es irgendwo in einer Datei im "chaos"-Ordner gespeichert ist und sowohl mit einem "#" anfängt, als auch aufhört.

            Navigieren Sie in den Ordner "{project}/chaos".

            Nutzen Sie grep, um das Passwort zu finden. (Tipp: der richtige reguläre Ausdruck ist "#.*#").
            "##),
            question("Wie lautet das magische Passwort (ohne die #)?"),
            r##"grep -roh "#.*#""##,
            Plan::check(Check::answer("parmigiana4life")),
        ),
        Exercise::new(
            "Find the difference",
            "Machen Sie sich mit der Funktionsweise von diff vertraut.",
            r#"
            Sie suchen nach einem kleinen Unterschied zwischen zwei Dateien.

            Verwenden Sie diff, um den Unterschied zwischen den beiden Dateien "kafka1.txt" und "kafka2.txt" im "chaos"-Ordner zu finden.
            "#,
            question("Wie lautet der Unterschied?"),
            "diff kafka1.txt kafka2.txt",
            Plan::check(Check::answer("Informatik ist cool")),
        ),
        Exercise::new(
            "Sortieren und ordnen",
            "Machen Sie sich mit der Funktionsweise von sort, uniq und der Ausgabeumleitung (<,>,|) vertraut.",
            format!(r#"
            Im Ordner "chaos" befindet sich eine Wortliste in der Datei "wortliste.txt", die jedoch beim Transport heftig durcheinander geraten ist. Außerdem sind noch einige Worte mehrfach vorhanden.

            Verwenden Sie sort und uniq, um die Liste zu sortieren und Dubletten zu entfernen. Speichern Sie das Ergebnis in der Datei "wortliste_sortiert.txt" im Ordner "{project}".
            "#),
            Prompt::Confirm,
            "cd chaos; sort wortliste.txt | uniq > ../wortliste_sortiert.txt",
            // collation differs between locales, hence two accepted words
            Plan::check(Check::LineAt {
                path: "wortliste_sortiert.txt".into(),
                line: 142,
                accepted: strings(&["ausbauchen", "Behelfsverkaufsstelle"]),
            }),
        ),
        Exercise::new(
            "Monnheim",
            "Machen Sie sich mit der Funktionsweise von grep, sed und der Ausgabeumleitung (<,>,|) vertraut.",
            format!(r#"
            Sie wollen aus der sortierten Wortliste einige Wörter mit "grep" heraussuchen und diese dann mit "sed" verändern.

            Finden Sie alle Wörter in der Liste "wortliste_sortiert.txt", in denen die Buchstabenfolge "heim" vorkommt. Ersetzen Sie diese Buchstaben durch "mannheim" und schreiben Sie das Ergebnis in eine neue Datei "monnheim.txt" im Ordner "{project}".
            "#),
            Prompt::Confirm,
            r#"grep heim wortliste_sortiert.txt | sed -e "s/heim/mannheim/g" > monnheim.txt"#,
            Plan::check(Check::FileLines {
                path: "monnheim.txt".into(),
                expected: strings(&[
                    "Billigmannheim",
                    "Blindenmannheim",
                    "Gemannheimkonto",
                    "Saisonmannheimspiel",
                    "Sportlermannheim",
                ]),
            }),
        ),
        Exercise::new(
            "Was heißt hier Softie?",
            r#"Machen Sie sich mit der Funktionsweise von Hard- und Softlinks und dem Kommando "ln" vertraut."#,
            format!(r#"
            Im Ordner "{project}" finden Sie eine Datei namens "highlander.txt". Erstellen Sie einen Softlink (symbolischen Link) namens "macleod.txt" auf diese Datei.
            "#),
            Prompt::Confirm,
            "ln -s highlander.txt macleod.txt",
            Plan::check(Check::Symlink("macleod.txt".into())).with_setup(Setup::WriteFileIfMissing {
                path: "highlander.txt".into(),
                contents: HIGHLANDER.to_string(),
            }),
        ),
        Exercise::new(
            "Nur die Harten kommen in den Garten",
            r#"Machen Sie sich mit der Funktionsweise von Hard- und Softlinks und dem Kommando "ln" vertraut."#,
            format!(r#"
            Im Ordner "{project}" finden Sie eine Datei namens "highlander.txt". Erstellen Sie einen Hardlink namens "fasil.txt" auf diese Datei. Öffnen Sie nun "fasil.txt" in einem Texteditor, ändern Sie den Inhalt zu "Es kann nur zwei geben!" und speichern Sie die Datei. Sehen Sie sich danach die Datei "highlander.txt" an.
            "#),
            Prompt::Confirm,
            "ln highlander.txt fasil.txt",
            Plan::check(Check::All(vec![
                Check::FileContent {
                    path: "fasil.txt".into(),
                    expected: "Es kann nur zwei geben!".to_string(),
                },
                Check::LinkCount { path: "fasil.txt".into(), count: 2 },
            ]))
            .with_setup(Setup::WriteFileIfMissing {
                path: "highlander.txt".into(),
                contents: HIGHLANDER.to_string(),
            }),
        ),
        Exercise::new(
            "Vertrauen ist nichts, Kontrolle ist alles",
            r#"Machen Sie sich mit der Funktionsweise von "ps" und "kill" vertraut."#,
            r#"
            Auf Ihrem System läuft ein Prozess mit dem Namen "sleep". Finden Sie ihn und beenden Sie den Prozess. Möglicherweise laufen auch mehrere Prozesse, dann beenden Sie alle mit dem Namen "sleep".
            "#,
            Prompt::Confirm,
            "ps aux | grep sleep ; kill ...",
            Plan::check(Check::NoProcess("sleep".to_string()))
                .with_setup(Setup::Sleeper { seconds: 100_000 }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size_and_order() {
        let exercises = catalog("linux-kurs");
        assert_eq!(exercises.len(), 23);
        assert_eq!(exercises[0].title, "Hilfe");
        assert_eq!(exercises[7].title, "Wer bin ich?");
        assert_eq!(exercises[22].title, "Vertrauen ist nichts, Kontrolle ist alles");
    }

    #[test]
    fn test_titles_are_unique_and_log_safe() {
        let exercises = catalog("linux-kurs");
        let titles: HashSet<_> = exercises.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles.len(), exercises.len());
        assert!(exercises.iter().all(|e| !e.title.contains('\t')));
    }

    #[test]
    fn test_project_name_in_instructions() {
        let exercises = catalog("mein-kurs");
        assert!(exercises[1].task_text().contains("\"mein-kurs\""));
        assert!(exercises[13].task_text().contains(CHAOS_URL));
    }

    #[test]
    fn test_question_prompts() {
        let exercises = catalog("linux-kurs");
        let questions: Vec<usize> = exercises
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e.prompt, Prompt::Question(_)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(questions, vec![0, 3, 7, 8, 15, 16, 17]);
    }
}
