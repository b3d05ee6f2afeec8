mod inspect;
mod run;
